//! 스크래핑 에러 타입.
//!
//! 페이지 구조 변경으로 인한 구조적 에러와 외부 협력자(HTTP, 마크업 파서)에서
//! 전파되는 에러를 하나의 분류 체계로 정의합니다.

use thiserror::Error;

use crate::types::PageKind;

/// 스크래핑 및 추출 에러.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// 테이블 시작 표식을 찾을 수 없음 (페이지 레이아웃 변경 또는 에러 페이지)
    #[error("{page} 페이지({ticker})에서 시작 표식 '{sentinel}'을(를) 찾을 수 없습니다")]
    SentinelNotFound {
        page: PageKind,
        ticker: String,
        sentinel: String,
    },

    /// 조각 수가 행 너비로 나누어떨어지지 않음
    #[error(
        "{page} 페이지({ticker}) 조각 정렬 실패: 행 너비 {width}, 조각 수 {actual} ({detail})"
    )]
    MisalignedSequence {
        page: PageKind,
        ticker: String,
        width: usize,
        actual: usize,
        detail: String,
    },

    /// 통계 테이블 행의 셀이 두 개 미만
    #[error("{page} 페이지({ticker}) {row}번째 행의 td 셀이 {cells}개뿐입니다")]
    StructuralRowError {
        page: PageKind,
        ticker: String,
        row: usize,
        cells: usize,
    },

    /// 상대 변화율 계산 구간에 데이터 없음
    #[error("Error: No data available for that period, try a lower number.")]
    NoDataForPeriod,

    /// HTTP 요청 실패 (네트워크, 타임아웃)
    #[error("요청 실패 ({url}): {reason}")]
    Fetch { url: String, reason: String },

    /// 성공이 아닌 HTTP 상태 코드
    #[error("HTTP 상태 {status} ({url})")]
    HttpStatus { url: String, status: u16 },

    /// 마크업/CSV/날짜 파싱 실패
    #[error("파싱 실패: {0}")]
    Parse(String),

    /// 필요한 컬럼 없음
    #[error("컬럼 없음: {0}")]
    MissingColumn(String),

    /// 빈 시계열
    #[error("데이터 행이 없습니다")]
    EmptySeries,

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),
}

/// 스크래핑 작업을 위한 Result 타입.
pub type ScrapeResult<T> = Result<T, ScrapeError>;

impl ScrapeError {
    /// 페이지 구조 변경을 의미하는 에러인지 확인합니다.
    ///
    /// 같은 마크업으로 재시도해도 결과가 같으므로 재시도 대상이 아닙니다.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ScrapeError::SentinelNotFound { .. }
                | ScrapeError::MisalignedSequence { .. }
                | ScrapeError::StructuralRowError { .. }
        )
    }

    /// 외부 협력자(HTTP, 파서)에서 전파된 에러인지 확인합니다.
    pub fn is_collaborator(&self) -> bool {
        matches!(
            self,
            ScrapeError::Fetch { .. } | ScrapeError::HttpStatus { .. } | ScrapeError::Parse(_)
        )
    }
}

impl From<config::ConfigError> for ScrapeError {
    fn from(err: config::ConfigError) -> Self {
        ScrapeError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_structural() {
        let err = ScrapeError::SentinelNotFound {
            page: PageKind::BalanceSheet,
            ticker: "AAPL".to_string(),
            sentinel: "Expand All".to_string(),
        };
        assert!(err.is_structural());
        assert!(!err.is_collaborator());

        let fetch = ScrapeError::Fetch {
            url: "https://example.com".to_string(),
            reason: "timeout".to_string(),
        };
        assert!(!fetch.is_structural());
        assert!(fetch.is_collaborator());
    }

    #[test]
    fn test_no_data_message() {
        assert_eq!(
            ScrapeError::NoDataForPeriod.to_string(),
            "Error: No data available for that period, try a lower number."
        );
    }

    #[test]
    fn test_misaligned_message_has_context() {
        let err = ScrapeError::MisalignedSequence {
            page: PageKind::History,
            ticker: "MSFT".to_string(),
            width: 7,
            actual: 22,
            detail: "나머지 1".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("MSFT"));
        assert!(msg.contains("7"));
        assert!(msg.contains("22"));
    }
}
