//! 주요 통계 조회 명령.

use std::path::Path;

use anyhow::{Context, Result};
use finscrape_data::YahooFinanceFetcher;
use tracing::info;

use super::output::{emit, spinner};

/// 주요 통계를 받아 출력하거나 CSV로 저장합니다.
pub async fn run(fetcher: &YahooFinanceFetcher, ticker: &str, output: Option<&Path>) -> Result<()> {
    let pb = spinner(format!("Fetching key statistics for {}...", ticker))?;
    let result = fetcher.fetch_statistics(ticker).await;
    pb.finish_and_clear();

    let table = result.with_context(|| format!("Failed to extract key statistics for {}", ticker))?;
    info!(ticker, parameters = table.row_count(), "statistics extracted");

    emit(&table, output)
}
