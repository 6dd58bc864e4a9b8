//! tracing 기반 로깅 초기화.
//!
//! 로그는 항상 표준 에러로 나갑니다. 표준 출력은 추출한 테이블 전용입니다.
//!
//! 출력 형식:
//! - **pretty**: 여러 줄, 색상 포함 (기본)
//! - **json**: 한 줄에 이벤트 하나, 로그 수집용
//! - **compact**: 한 줄 요약

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::error::{ScrapeError, ScrapeResult};

/// 이 워크스페이스 crate 대상 (필터 지시어용)
const CRATE_TARGETS: [&str; 3] = ["finscrape_core", "finscrape_data", "finscrape"];

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(format!("알 수 없는 로그 형식: {} (pretty, json, compact)", other)),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// 워크스페이스 crate에 적용할 레벨 또는 완전한 필터 지시어
    /// (예: "debug", "finscrape_data=trace,reqwest=debug")
    pub level: String,
    pub format: LogFormat,
    /// 추출 span 진입/종료 이벤트 출력
    pub with_span_events: bool,
    /// 파일명과 줄 번호 출력
    pub with_source_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            with_span_events: false,
            with_source_location: false,
        }
    }
}

impl LogConfig {
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Default::default()
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.with_span_events = enabled;
        self
    }

    /// `RUST_LOG`, `LOG_FORMAT` 환경 변수에서 설정을 생성합니다.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(level) = std::env::var("RUST_LOG") {
            config.level = level;
        }
        if let Some(format) = std::env::var("LOG_FORMAT").ok().and_then(|s| s.parse().ok()) {
            config.format = format;
        }
        config
    }

    /// 필터 지시어 문자열.
    ///
    /// 레벨만 주어지면 워크스페이스 crate에만 적용하고 나머지(HTTP 클라이언트,
    /// HTML 파서 등)는 `warn`으로 둡니다. `=`나 `,`가 있으면 그대로 사용합니다.
    pub fn filter_directives(&self) -> String {
        let level = self.level.trim();
        if level.contains('=') || level.contains(',') {
            return level.to_string();
        }

        std::iter::once("warn".to_string())
            .chain(CRATE_TARGETS.iter().map(|target| format!("{}={}", target, level)))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// 전역 subscriber를 설치합니다. 프로세스당 한 번만 성공합니다.
///
/// ```no_run
/// use finscrape_core::logging::{init_logging, LogConfig, LogFormat};
///
/// init_logging(LogConfig::new("debug").with_format(LogFormat::Json))?;
/// # Ok::<(), finscrape_core::ScrapeError>(())
/// ```
pub fn init_logging(config: LogConfig) -> ScrapeResult<()> {
    let filter = EnvFilter::try_new(config.filter_directives())
        .map_err(|e| ScrapeError::Config(format!("잘못된 로그 필터 '{}': {}", config.level, e)))?;

    let span_events = if config.with_span_events {
        FmtSpan::ENTER | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let base = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(config.with_source_location)
        .with_line_number(config.with_source_location)
        .with_span_events(span_events);

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match config.format {
        LogFormat::Pretty => base.pretty().boxed(),
        LogFormat::Json => base.json().with_current_span(true).boxed(),
        LogFormat::Compact => base.compact().boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .map_err(|e| ScrapeError::Config(format!("로깅 초기화 실패: {}", e)))?;

    tracing::debug!(format = ?config.format, filter = %config.filter_directives(), "logging ready");
    Ok(())
}

/// 페이지 종류와 티커 필드를 가진 추출 span.
#[macro_export]
macro_rules! extraction_span {
    ($page:expr, $ticker:expr) => {
        tracing::info_span!("extract", page = %$page, ticker = %$ticker)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!(" JSON ".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_level_scoped_to_workspace_crates() {
        assert_eq!(
            LogConfig::new("debug").filter_directives(),
            "warn,finscrape_core=debug,finscrape_data=debug,finscrape=debug"
        );
    }

    #[test]
    fn test_full_directives_pass_through() {
        let config = LogConfig::new("finscrape_data=trace,reqwest=debug");
        assert_eq!(config.filter_directives(), "finscrape_data=trace,reqwest=debug");
    }

    #[test]
    fn test_builder() {
        let config = LogConfig::new("info")
            .with_format(LogFormat::Compact)
            .with_span_events(true);

        assert_eq!(config.format, LogFormat::Compact);
        assert!(config.with_span_events);
        assert!(!config.with_source_location);
    }
}
