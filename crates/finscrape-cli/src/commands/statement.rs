//! 재무제표 조회 명령.

use std::path::Path;

use anyhow::{Context, Result};
use finscrape_core::StatementKind;
use finscrape_data::YahooFinanceFetcher;
use tracing::info;

use super::output::{emit, spinner};

/// 재무제표를 받아 출력하거나 CSV로 저장합니다.
pub async fn run(
    fetcher: &YahooFinanceFetcher,
    ticker: &str,
    kind: StatementKind,
    output: Option<&Path>,
) -> Result<()> {
    let pb = spinner(format!("Fetching {} {}...", ticker, kind))?;
    let result = fetcher.fetch_statement(ticker, kind).await;
    pb.finish_and_clear();

    let table = result.with_context(|| format!("Failed to extract {} for {}", kind, ticker))?;
    info!(ticker, %kind, periods = table.row_count(), "statement extracted");

    emit(&table, output)
}
