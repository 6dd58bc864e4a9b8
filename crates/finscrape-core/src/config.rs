//! 설정 관리.
//!
//! 기본값 → TOML 파일(선택) → `FINSCRAPE__` 접두사 환경 변수 순으로 덮어씁니다.
//!
//! ```toml
//! [http]
//! timeout_secs = 10
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ScrapeResult;
use crate::logging::{LogConfig, LogFormat};

/// 차단을 피하기 위한 브라우저 User-Agent
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/96.0.4664.111 Safari/537.36";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScraperConfig {
    /// HTTP 설정
    #[serde(default)]
    pub http: HttpConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP 요청 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// 요청 User-Agent 헤더
    pub user_agent: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// 견적 페이지 기본 URL
    pub quote_base_url: String,
    /// CSV 다운로드 기본 URL
    pub download_base_url: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            quote_base_url: "https://finance.yahoo.com".to_string(),
            download_base_url: "https://query1.finance.yahoo.com".to_string(),
        }
    }
}

impl HttpConfig {
    /// 요청 타임아웃을 Duration으로 반환
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LoggingConfig {
    /// 로깅 초기화용 설정으로 변환합니다. 알 수 없는 형식은 pretty로 대체합니다.
    pub fn to_log_config(&self) -> LogConfig {
        let format = self.format.parse().unwrap_or(LogFormat::Pretty);
        LogConfig::new(self.level.clone()).with_format(format)
    }
}

impl ScraperConfig {
    /// 파일(선택)과 환경 변수에서 설정을 로드합니다.
    pub fn load(path: Option<&Path>) -> ScrapeResult<Self> {
        let defaults = HttpConfig::default();
        let logging = LoggingConfig::default();

        let mut builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("http.user_agent", defaults.user_agent)?
            .set_default("http.timeout_secs", defaults.timeout_secs as i64)?
            .set_default("http.quote_base_url", defaults.quote_base_url)?
            .set_default("http.download_base_url", defaults.download_base_url)?
            .set_default("logging.level", logging.level)?
            .set_default("logging.format", logging.format)?;

        // 파일에서 로드
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        // 환경 변수로 오버라이드
        let config = builder
            .add_source(
                config::Environment::with_prefix("FINSCRAPE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScraperConfig::default();
        assert!(config.http.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(config.http.timeout(), Duration::from_secs(30));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = ScraperConfig::load(None).unwrap();
        assert_eq!(config.http.quote_base_url, "https://finance.yahoo.com");
        assert_eq!(config.http.download_base_url, "https://query1.finance.yahoo.com");
    }

    #[test]
    fn test_logging_config_conversion() {
        let logging = LoggingConfig {
            level: "debug".to_string(),
            format: "json".to_string(),
        };
        let log = logging.to_log_config();
        assert_eq!(log.level, "debug");
        assert_eq!(log.format, LogFormat::Json);

        let fallback = LoggingConfig {
            level: "info".to_string(),
            format: "fancy".to_string(),
        };
        assert_eq!(fallback.to_log_config().format, LogFormat::Pretty);
    }
}
