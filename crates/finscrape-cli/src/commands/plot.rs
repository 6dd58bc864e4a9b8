//! 종가 차트 명령.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use finscrape_data::{PriceChart, YahooFinanceFetcher};
use tracing::info;

use super::history::{fetch_prices, HistorySource};

/// SVG 크기
pub const CHART_WIDTH: u32 = 960;
pub const CHART_HEIGHT: u32 = 540;

/// 종가 차트를 SVG(및 선택적으로 JSON)로 저장합니다.
pub async fn run(
    fetcher: &YahooFinanceFetcher,
    ticker: &str,
    from: NaiveDate,
    to: NaiveDate,
    source: HistorySource,
    svg_path: &Path,
    json_path: Option<&Path>,
) -> Result<()> {
    let table = fetch_prices(fetcher, ticker, from, to, source).await?;
    let chart = PriceChart::from_table(ticker, &table)
        .with_context(|| format!("Failed to build price chart for {}", ticker))?;

    let svg = chart.render_svg(CHART_WIDTH, CHART_HEIGHT)?;
    std::fs::write(svg_path, svg)
        .with_context(|| format!("Failed to write chart: {}", svg_path.display()))?;
    info!(path = %svg_path.display(), points = chart.points.len(), "chart saved");

    if let Some(path) = json_path {
        std::fs::write(path, chart.to_json()?)
            .with_context(|| format!("Failed to write chart data: {}", path.display()))?;
    }

    println!("{}", chart.title);
    println!("  최고: {}", chart.max.label);
    println!("  최저: {}", chart.min.label);
    println!("저장 위치: {}", svg_path.display());

    Ok(())
}
