//! 데이터 Provider 모듈.
//!
//! ## Yahoo Finance
//! - `YahooFinanceFetcher`: 견적 페이지 HTML 및 과거 주가 CSV 수집
//! - 재무제표, 주요 통계, 과거 주가

pub mod yahoo;

pub use yahoo::YahooFinanceFetcher;
