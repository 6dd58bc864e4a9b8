//! 과거 주가 조회 명령.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::ValueEnum;
use finscrape_core::ResultTable;
use finscrape_data::YahooFinanceFetcher;
use tracing::info;

use super::output::{emit, spinner};

/// 과거 주가 소스
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum HistorySource {
    /// 과거 주가 HTML 페이지 추출
    Page,
    /// CSV 다운로드
    #[default]
    Download,
}

impl fmt::Display for HistorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page => write!(f, "page"),
            Self::Download => write!(f, "download"),
        }
    }
}

/// 날짜 문자열 파싱 (YYYY-MM-DD)
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format: {}. Expected YYYY-MM-DD", s))
}

/// `from`부터 `to`까지 과거 주가 테이블을 가져옵니다.
pub async fn fetch_prices(
    fetcher: &YahooFinanceFetcher,
    ticker: &str,
    from: NaiveDate,
    to: NaiveDate,
    source: HistorySource,
) -> Result<ResultTable> {
    if from > to {
        anyhow::bail!("Start date {} must be before end date {}", from, to);
    }

    let pb = spinner(format!("Fetching {} price history ({})...", ticker, source))?;
    let result = match source {
        HistorySource::Page => fetcher.fetch_history(ticker, from, to).await,
        HistorySource::Download => fetcher.download_history(ticker, from, to).await,
    };
    pb.finish_and_clear();

    let table =
        result.with_context(|| format!("Failed to fetch price history for {}", ticker))?;
    info!(ticker, %source, rows = table.row_count(), "price history fetched");

    Ok(table)
}

/// 과거 주가를 출력하거나 CSV로 저장합니다.
pub async fn run(
    fetcher: &YahooFinanceFetcher,
    ticker: &str,
    from: NaiveDate,
    to: NaiveDate,
    source: HistorySource,
    output: Option<&Path>,
) -> Result<()> {
    let table = fetch_prices(fetcher, ticker, from, to, source).await?;
    emit(&table, output)
}
