//! Yahoo Finance 페이지 수집기.
//!
//! 견적 페이지(재무제표, 주요 통계, 과거 주가)의 HTML과 과거 주가 CSV를
//! 받아와 추출 파이프라인에 넘깁니다.
//!
//! ## 데이터 소스
//! - `/quote/{ticker}/{balance-sheet|financials|cash-flow}`: 재무제표
//! - `/quote/{ticker}/key-statistics`: 주요 통계
//! - `/quote/{ticker}/history`: 과거 주가 페이지
//! - `query1` `/v7/finance/download/{ticker}`: 과거 주가 CSV
//!
//! ## 사용 예시
//! ```rust,ignore
//! let fetcher = YahooFinanceFetcher::new()?;
//! let table = fetcher.fetch_statement("AAPL", StatementKind::BalanceSheet).await?;
//! println!("{} periods", table.row_count());
//! ```

use chrono::{NaiveDate, NaiveTime};
use finscrape_core::{HttpConfig, ResultTable, ScrapeError, ScrapeResult, StatementKind};
use reqwest::Client;
use tracing::{debug, info};

use crate::extract::{extract_history, extract_statement, extract_statistics};
use crate::history_csv::parse_history_csv;
use crate::markup::parse_document;

/// Yahoo Finance 수집기
///
/// 모든 요청에 브라우저 User-Agent를 붙이며, 실패는 재시도 없이 바로 반환합니다.
pub struct YahooFinanceFetcher {
    client: Client,
    quote_base_url: String,
    download_base_url: String,
}

impl YahooFinanceFetcher {
    /// 기본 설정으로 생성
    pub fn new() -> ScrapeResult<Self> {
        Self::from_config(&HttpConfig::default())
    }

    /// HTTP 설정으로 생성
    pub fn from_config(config: &HttpConfig) -> ScrapeResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ScrapeError::Config(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            client,
            quote_base_url: config.quote_base_url.trim_end_matches('/').to_string(),
            download_base_url: config.download_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn statement_url(&self, ticker: &str, kind: StatementKind) -> String {
        format!(
            "{}/quote/{}/{}?p={}",
            self.quote_base_url,
            ticker,
            kind.slug(),
            ticker
        )
    }

    pub fn statistics_url(&self, ticker: &str) -> String {
        format!("{}/quote/{}/key-statistics?p={}", self.quote_base_url, ticker, ticker)
    }

    pub fn history_url(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> String {
        let (period1, period2) = period_bounds(start, end);
        format!(
            "{}/quote/{}/history?period1={}&period2={}&interval=1d&filter=history&p={}",
            self.quote_base_url, ticker, period1, period2, ticker
        )
    }

    pub fn download_url(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> String {
        let (period1, period2) = period_bounds(start, end);
        format!(
            "{}/v7/finance/download/{}?period1={}&period2={}&interval=1d&events=history&includeAdjustedClose=true",
            self.download_base_url, ticker, period1, period2
        )
    }

    /// 재무제표 페이지를 받아 기간별 정수 테이블로 추출합니다.
    pub async fn fetch_statement(
        &self,
        ticker: &str,
        kind: StatementKind,
    ) -> ScrapeResult<ResultTable> {
        let body = self.fetch_text(&self.statement_url(ticker, kind)).await?;
        let document = parse_document(&body)?;
        extract_statement(&document.root_element(), kind, ticker)
    }

    /// 주요 통계 페이지를 받아 레이블/값 테이블로 추출합니다.
    pub async fn fetch_statistics(&self, ticker: &str) -> ScrapeResult<ResultTable> {
        let body = self.fetch_text(&self.statistics_url(ticker)).await?;
        let document = parse_document(&body)?;
        extract_statistics(&document.root_element(), ticker)
    }

    /// 과거 주가 페이지를 받아 날짜별 테이블로 추출합니다.
    pub async fn fetch_history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ScrapeResult<ResultTable> {
        let body = self.fetch_text(&self.history_url(ticker, start, end)).await?;
        let document = parse_document(&body)?;
        extract_history(&document.root_element(), ticker)
    }

    /// 과거 주가 CSV를 내려받아 테이블로 변환합니다.
    pub async fn download_history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ScrapeResult<ResultTable> {
        let body = self.fetch_text(&self.download_url(ticker, start, end)).await?;
        parse_history_csv(&body)
    }

    /// GET 요청 후 응답 본문을 반환합니다.
    async fn fetch_text(&self, url: &str) -> ScrapeResult<String> {
        debug!(url, "requesting page");

        let response = self.client.get(url).send().await.map_err(|e| ScrapeError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| ScrapeError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        info!(url, bytes = body.len(), "fetched page");
        Ok(body)
    }
}

/// 시작일 UTC 자정과 종료일 끝(23:59:59) 유닉스 타임스탬프
fn period_bounds(start: NaiveDate, end: NaiveDate) -> (i64, i64) {
    let period1 = start.and_time(NaiveTime::MIN).and_utc().timestamp();
    let period2 = end
        .and_hms_opt(23, 59, 59)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or(period1);
    (period1, period2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fetcher_for(server: &mockito::ServerGuard) -> YahooFinanceFetcher {
        let config = HttpConfig {
            quote_base_url: server.url(),
            download_base_url: server.url(),
            ..HttpConfig::default()
        };
        YahooFinanceFetcher::from_config(&config).unwrap()
    }

    #[test]
    fn test_urls() {
        let fetcher = YahooFinanceFetcher::new().unwrap();

        assert_eq!(
            fetcher.statement_url("AAPL", StatementKind::CashFlow),
            "https://finance.yahoo.com/quote/AAPL/cash-flow?p=AAPL"
        );
        assert_eq!(
            fetcher.statistics_url("AAPL"),
            "https://finance.yahoo.com/quote/AAPL/key-statistics?p=AAPL"
        );
        assert_eq!(
            fetcher.download_url("MSFT", date(2024, 1, 1), date(2024, 1, 2)),
            "https://query1.finance.yahoo.com/v7/finance/download/MSFT?period1=1704067200&period2=1704239999&interval=1d&events=history&includeAdjustedClose=true"
        );
    }

    #[tokio::test]
    async fn test_fetch_statement_sends_user_agent() {
        let mut server = mockito::Server::new_async().await;
        let body = "<html><body>\
            <div>Expand All</div><div>12/31/2023</div><div>12/31/2022</div>\
            <div>12/31/2021</div><div>12/31/2020</div>\
            <div>Total Assets</div><div>4</div><div>3</div><div>2</div><div>1</div>\
            </body></html>";
        let mock = server
            .mock("GET", "/quote/AAPL/balance-sheet")
            .match_query(mockito::Matcher::UrlEncoded("p".into(), "AAPL".into()))
            .match_header("user-agent", finscrape_core::DEFAULT_USER_AGENT)
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let table = fetcher_for(&server)
            .fetch_statement("AAPL", StatementKind::BalanceSheet)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            table.column("Total Assets").unwrap().as_integers().unwrap(),
            &[1, 2, 3, 4]
        );
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/quote/ZZZZ/key-statistics")
            .match_query(mockito::Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let err = fetcher_for(&server).fetch_statistics("ZZZZ").await.unwrap_err();

        assert!(matches!(err, ScrapeError::HttpStatus { status: 404, .. }));
        assert!(err.is_collaborator());
    }

    #[tokio::test]
    async fn test_empty_body_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/quote/AAPL/key-statistics")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("")
            .create_async()
            .await;

        let err = fetcher_for(&server).fetch_statistics("AAPL").await.unwrap_err();
        assert!(matches!(err, ScrapeError::Parse(_)));
    }

    #[tokio::test]
    async fn test_download_history() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v7/finance/download/MSFT")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("period1".into(), "1704067200".into()),
                mockito::Matcher::UrlEncoded("events".into(), "history".into()),
            ]))
            .with_status(200)
            .with_body("Date,Open,High,Low,Close,Adj Close,Volume\n2024-01-02,1,2,0.5,1.5,1.4,100\n")
            .create_async()
            .await;

        let table = fetcher_for(&server)
            .download_history("MSFT", date(2024, 1, 1), date(2024, 1, 2))
            .await
            .unwrap();

        assert_eq!(table.row_count(), 1);
        assert_eq!(table.column("Adj_Close").unwrap().as_floats().unwrap(), &[1.4]);
    }

    #[tokio::test]
    async fn test_connection_failure_is_fetch_error() {
        let config = HttpConfig {
            quote_base_url: "http://127.0.0.1:1".to_string(),
            ..HttpConfig::default()
        };
        let fetcher = YahooFinanceFetcher::from_config(&config).unwrap();

        let err = fetcher.fetch_statistics("AAPL").await.unwrap_err();
        assert!(matches!(err, ScrapeError::Fetch { .. }));
    }

    #[tokio::test]
    #[ignore] // 실제 네트워크 테스트는 ignore
    async fn test_fetch_apple_balance_sheet() {
        let fetcher = YahooFinanceFetcher::new().unwrap();
        match fetcher.fetch_statement("AAPL", StatementKind::BalanceSheet).await {
            Ok(table) => {
                println!("AAPL balance sheet: {:?}", table.headers());
                assert!(table.row_count() > 0);
            }
            Err(e) => eprintln!("오류: {}", e),
        }
    }
}
