//! 마크업 트리에서 결과 테이블을 추출하는 파이프라인.
//!
//! 모든 페이지 모드는 같은 단계를 거칩니다:
//!
//! 1. **Flatten**: 노드 트리를 텍스트 조각 시퀀스로 평탄화
//! 2. **Trim**: 시작 표식 앞과 종료 표식 뒤를 잘라냄
//! 3. **Normalize**: 조각이 모자란 특수 행(배당) 보정
//! 4. **Group & coerce**: 행 너비로 묶어 헤더를 승격하고 컬럼 타입 변환
//!
//! 모드별 차이(태그, 행 너비, 표식, 헤더 이름 변경, 전치 여부)는
//! 아래 상수와 진입 함수에 모여 있습니다.

pub mod coerce;
pub mod flatten;
pub mod group;
pub mod normalize;
pub mod trim;

use finscrape_core::{
    extraction_span, PageKind, RawTable, ResultTable, ScrapeError, ScrapeResult, StatementKind,
};
use tracing::{info, warn};

use crate::markup::MarkupNode;
use flatten::{flatten_label_value_rows, flatten_tagged};
use group::{group_fragments, history_table, statement_table, statistics_table};
use normalize::{pad_label_rows, DIVIDEND_LABEL};
use trim::{trim_fragments, Terminator};

/// 재무제표 조각을 담는 태그
pub const STATEMENT_TAG: &str = "div";

/// 재무제표 테이블 시작 표식
pub const STATEMENT_SENTINEL: &str = "Expand All";

/// 재무제표 첫 헤더 이름 변경
pub const STATEMENT_RENAME: &[(&str, &str)] = &[(STATEMENT_SENTINEL, "Breakdown")];

/// 과거 주가 조각을 담는 태그
pub const HISTORY_TAG: &str = "span";

/// 과거 주가 테이블 시작 표식
pub const HISTORY_SENTINEL: &str = "Date";

/// 과거 주가 테이블 뒤 부가 문구 시작
pub const HISTORY_TERMINATOR: &str = "*Close price adjusted for splits.";

/// 과거 주가 헤더 이름 변경
pub const HISTORY_RENAME: &[(&str, &str)] = &[("Close*", "Close"), ("Adj Close**", "Adj Close")];

/// 과거 주가 행 너비 (Date, Open, High, Low, Close, Adj Close, Volume)
pub const HISTORY_ROW_WIDTH: usize = 7;

/// 통계 테이블 고정 헤더
pub const STATISTICS_HEADERS: [&str; 2] = ["parameter", "value"];

/// 추출 중인 페이지와 티커. 에러에 문맥을 붙이는 데 사용합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    pub page: PageKind,
    pub ticker: String,
}

impl PageContext {
    pub fn new(page: PageKind, ticker: impl Into<String>) -> Self {
        Self {
            page,
            ticker: ticker.into(),
        }
    }

    pub fn sentinel_not_found(&self, sentinel: &str) -> ScrapeError {
        ScrapeError::SentinelNotFound {
            page: self.page,
            ticker: self.ticker.clone(),
            sentinel: sentinel.to_string(),
        }
    }

    pub fn misaligned(&self, width: usize, actual: usize, detail: String) -> ScrapeError {
        ScrapeError::MisalignedSequence {
            page: self.page,
            ticker: self.ticker.clone(),
            width,
            actual,
            detail,
        }
    }

    pub fn structural_row(&self, row: usize, cells: usize) -> ScrapeError {
        ScrapeError::StructuralRowError {
            page: self.page,
            ticker: self.ticker.clone(),
            row,
            cells,
        }
    }
}

/// 재무제표(대차대조표, 손익계산서, 현금흐름표) 페이지를 추출합니다.
///
/// 결과는 `Period` 키 컬럼과 항목별 정수 컬럼이며 기간 오름차순입니다.
pub fn extract_statement<N: MarkupNode>(
    root: &N,
    kind: StatementKind,
    ticker: &str,
) -> ScrapeResult<ResultTable> {
    let ctx = PageContext::new(kind.page_kind(), ticker);
    let span = extraction_span!(ctx.page, ctx.ticker);
    let _guard = span.enter();

    let fragments = flatten_tagged(root, STATEMENT_TAG)?;
    let fragments = trim_fragments(fragments, STATEMENT_SENTINEL, None, &ctx)?;
    let raw = group_fragments(&fragments, kind.row_width(), STATEMENT_RENAME, &ctx)?;
    let table = statement_table(&raw)?;

    report(&ctx, &table);
    Ok(table)
}

/// 과거 주가 페이지를 추출합니다.
///
/// 결과는 `Date` 키 컬럼, 가격 실수 컬럼, `Volume` 정수 컬럼이며 날짜 오름차순입니다.
pub fn extract_history<N: MarkupNode>(root: &N, ticker: &str) -> ScrapeResult<ResultTable> {
    let ctx = PageContext::new(PageKind::History, ticker);
    let span = extraction_span!(ctx.page, ctx.ticker);
    let _guard = span.enter();

    let fragments = flatten_tagged(root, HISTORY_TAG)?;
    let fragments = trim_fragments(
        fragments,
        HISTORY_SENTINEL,
        Some(Terminator::Exclusive(HISTORY_TERMINATOR)),
        &ctx,
    )?;
    let fragments = pad_label_rows(fragments, DIVIDEND_LABEL, HISTORY_ROW_WIDTH, &ctx)?;
    let raw = group_fragments(&fragments, HISTORY_ROW_WIDTH, HISTORY_RENAME, &ctx)?;
    let table = history_table(&raw)?;

    report(&ctx, &table);
    Ok(table)
}

/// 주요 통계 페이지를 추출합니다.
///
/// 결과는 `parameter`/`value` 텍스트 컬럼이며 페이지 순서를 유지합니다.
pub fn extract_statistics<N: MarkupNode>(root: &N, ticker: &str) -> ScrapeResult<ResultTable> {
    let ctx = PageContext::new(PageKind::Statistics, ticker);
    let span = extraction_span!(ctx.page, ctx.ticker);
    let _guard = span.enter();

    let fragments = flatten_label_value_rows(root, &ctx)?.collect::<ScrapeResult<Vec<_>>>()?;
    let headers = STATISTICS_HEADERS.iter().map(|h| h.to_string()).collect();
    let raw = RawTable::with_headers(headers, &fragments).ok_or_else(|| {
        ctx.misaligned(STATISTICS_HEADERS.len(), fragments.len(), "레이블/값 쌍이 아님".to_string())
    })?;
    let table = statistics_table(&raw)?;

    report(&ctx, &table);
    Ok(table)
}

fn report(ctx: &PageContext, table: &ResultTable) {
    if table.coercion_failures() > 0 {
        warn!(
            page = %ctx.page,
            ticker = %ctx.ticker,
            failures = table.coercion_failures(),
            "non-numeric cells replaced with 0"
        );
    }

    info!(
        rows = table.row_count(),
        columns = table.columns().len() + 1,
        "extracted table"
    );
}
