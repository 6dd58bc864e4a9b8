//! 금융 페이지 수집 및 테이블 추출.
//!
//! 이 crate는 다음을 제공합니다:
//! - 마크업 노드 추상화와 `scraper` 어댑터
//! - 조각 시퀀스 기반 테이블 추출 파이프라인 (재무제표, 주요 통계, 과거 주가)
//! - 과거 주가 CSV 파싱
//! - Yahoo Finance 수집기
//! - 종가 차트

pub mod chart;
pub mod extract;
pub mod history_csv;
pub mod markup;
pub mod provider;

pub use chart::{ChartMarker, ChartPoint, PriceChart};
pub use extract::{extract_history, extract_statement, extract_statistics, PageContext};
pub use history_csv::parse_history_csv;
pub use markup::{parse_document, MarkupNode};
pub use provider::YahooFinanceFetcher;
