//! 금융 정보 스크래핑 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 대차대조표 (기간별 행)
//! finscrape statement -s AAPL -k balance-sheet
//!
//! # 현금흐름표를 CSV로 저장
//! finscrape statement -s AAPL -k cash-flow -o data/aapl_cash_flow.csv
//!
//! # 주요 통계
//! finscrape stats -s MSFT
//!
//! # 과거 주가 (CSV 다운로드 또는 HTML 페이지)
//! finscrape history -s MSFT -f 2024-01-01 --source page
//!
//! # 종가 차트
//! finscrape plot -s TSLA -f 2023-01-01 -o tsla.svg --json tsla.json
//!
//! # 3개월 전 대비 변화율
//! finscrape change -s AAPL -f 2024-01-01 -n 3
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use finscrape_core::{init_logging, LogConfig, ScraperConfig, StatementKind};
use finscrape_data::YahooFinanceFetcher;
use tracing::{debug, error};

mod commands;

use commands::history::{parse_date, HistorySource};

#[derive(Parser)]
#[command(name = "finscrape")]
#[command(about = "Financial statement, statistics and price history scraper", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 디버그 로그 출력
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 재무제표 조회 (balance-sheet, financials, cash-flow)
    Statement {
        /// 티커 (예: AAPL)
        #[arg(short, long)]
        symbol: String,

        /// 재무제표 종류
        #[arg(short, long, default_value = "balance-sheet")]
        kind: StatementKind,

        /// CSV 출력 파일 경로 (지정하지 않으면 stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 주요 통계 조회
    Stats {
        /// 티커
        #[arg(short, long)]
        symbol: String,

        /// CSV 출력 파일 경로 (지정하지 않으면 stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 과거 주가 조회
    History {
        /// 티커
        #[arg(short, long)]
        symbol: String,

        /// 시작 날짜 (YYYY-MM-DD)
        #[arg(short = 'f', long)]
        from: String,

        /// 종료 날짜 (YYYY-MM-DD, 기본: 오늘)
        #[arg(short, long)]
        to: Option<String>,

        /// 데이터 소스
        #[arg(long, value_enum, default_value_t = HistorySource::Download)]
        source: HistorySource,

        /// CSV 출력 파일 경로 (지정하지 않으면 stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 종가 차트 (최고가/최저가 표시)
    Plot {
        /// 티커
        #[arg(short, long)]
        symbol: String,

        /// 시작 날짜 (YYYY-MM-DD)
        #[arg(short = 'f', long)]
        from: String,

        /// 데이터 소스
        #[arg(long, value_enum, default_value_t = HistorySource::Download)]
        source: HistorySource,

        /// SVG 출력 파일 경로
        #[arg(short, long)]
        output: PathBuf,

        /// 차트 데이터 JSON 출력 경로
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// N개월 전 대비 종가 변화율
    Change {
        /// 티커
        #[arg(short, long)]
        symbol: String,

        /// 시작 날짜 (YYYY-MM-DD)
        #[arg(short = 'f', long)]
        from: String,

        /// 비교 기간 (개월)
        #[arg(short = 'n', long, default_value = "3")]
        months: u32,

        /// 데이터 소스
        #[arg(long, value_enum, default_value_t = HistorySource::Download)]
        source: HistorySource,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = ScraperConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // RUST_LOG가 있으면 설정 파일보다 우선
    let mut log_config = if std::env::var_os("RUST_LOG").is_some() {
        LogConfig::from_env()
    } else {
        config.logging.to_log_config()
    };
    if cli.verbose {
        log_config.level = "debug".to_string();
    }
    init_logging(log_config).context("Failed to initialize logging")?;
    debug!(?config, "configuration loaded");

    let fetcher = YahooFinanceFetcher::from_config(&config.http)?;

    let result = match cli.command {
        Commands::Statement {
            symbol,
            kind,
            output,
        } => commands::statement::run(&fetcher, &symbol, kind, output.as_deref()).await,

        Commands::Stats { symbol, output } => {
            commands::stats::run(&fetcher, &symbol, output.as_deref()).await
        }

        Commands::History {
            symbol,
            from,
            to,
            source,
            output,
        } => {
            let from = parse_date(&from)?;
            let to = match to {
                Some(to) => parse_date(&to)?,
                None => Local::now().date_naive(),
            };
            commands::history::run(&fetcher, &symbol, from, to, source, output.as_deref()).await
        }

        Commands::Plot {
            symbol,
            from,
            source,
            output,
            json,
        } => {
            let from = parse_date(&from)?;
            let to = Local::now().date_naive();
            commands::plot::run(&fetcher, &symbol, from, to, source, &output, json.as_deref())
                .await
        }

        Commands::Change {
            symbol,
            from,
            months,
            source,
        } => {
            let from = parse_date(&from)?;
            commands::change::run(&fetcher, &symbol, from, months, source).await
        }
    };

    if let Err(e) = &result {
        error!("{:#}", e);
    }

    result
}
