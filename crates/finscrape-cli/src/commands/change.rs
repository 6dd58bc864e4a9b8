//! 상대 변화율 명령.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use finscrape_core::{relative_change, ScrapeError};
use finscrape_data::YahooFinanceFetcher;
use tracing::warn;

use super::history::{fetch_prices, HistorySource};

/// 최근 종가와 `months`개월 전 종가의 변화율을 출력합니다.
///
/// 해당 구간에 데이터가 없으면 실패하지 않고 안내 메시지를 출력합니다.
pub async fn run(
    fetcher: &YahooFinanceFetcher,
    ticker: &str,
    from: NaiveDate,
    months: u32,
    source: HistorySource,
) -> Result<()> {
    let today = Local::now().date_naive();
    let table = fetch_prices(fetcher, ticker, from, today, source).await?;

    match relative_change(&table, months, today) {
        Ok(change) => println!("{}", change),
        Err(err @ ScrapeError::NoDataForPeriod) => {
            warn!(ticker, months, "no price data in reference window");
            println!("{}", err);
        }
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to compute change for {}", ticker))
        }
    }

    Ok(())
}
