//! 조각을 고정 너비 행으로 묶고 컬럼 타입을 변환합니다.

use std::collections::HashSet;

use finscrape_core::{Column, ColumnData, Period, RawTable, ResultTable, ScrapeError, ScrapeResult};
use tracing::debug;

use super::coerce::{
    coerce_floats, coerce_integers, parse_dates, HISTORY_DATE_FORMAT, STATEMENT_INDEX_WIDTH,
    VOLUME_INDEX_WIDTH,
};
use super::PageContext;

/// 전치 후 기간 키 컬럼 이름
pub const PERIOD_KEY: &str = "Period";

/// 과거 주가 키 컬럼 이름
pub const DATE_KEY: &str = "Date";

/// 과거 주가 실수 컬럼
pub const PRICE_COLUMNS: [&str; 5] = ["Open", "High", "Low", "Close", "Adj Close"];

/// 과거 주가 거래량 컬럼
pub const VOLUME_COLUMN: &str = "Volume";

/// 조각을 `width`개씩 묶고 첫 청크를 헤더로 승격한 뒤 헤더 이름을 바꿉니다.
pub fn group_fragments(
    fragments: &[String],
    width: usize,
    rename: &[(&str, &str)],
    ctx: &PageContext,
) -> ScrapeResult<RawTable> {
    if width == 0 || fragments.len() % width != 0 {
        return Err(ctx.misaligned(
            width,
            fragments.len(),
            format!("나머지 {}", fragments.len() % width.max(1)),
        ));
    }

    let mut table = RawTable::from_chunks(fragments, width)
        .ok_or_else(|| ctx.misaligned(width, 0, "빈 시퀀스".to_string()))?;
    table.rename_headers(rename);

    debug!(
        columns = table.column_count(),
        rows = table.row_count(),
        "grouped fragments"
    );

    Ok(table)
}

/// 재무제표 테이블: 기간을 행으로 전치하고 모든 항목을 정수로 변환합니다.
pub fn statement_table(raw: &RawTable) -> ScrapeResult<ResultTable> {
    let transposed = raw.transpose(PERIOD_KEY);
    let headers = unique_headers(transposed.headers());

    let labels: Vec<&str> = transposed.column(0).collect();
    let key = Column::new(
        PERIOD_KEY,
        ColumnData::Period(labels.iter().map(|l| Period::parse(l)).collect()),
    );

    let mut failures = 0;
    let columns: Vec<Column> = headers
        .into_iter()
        .enumerate()
        .skip(1)
        .map(|(index, name)| {
            let coerced = coerce_integers(
                labels.iter().copied(),
                transposed.column(index),
                STATEMENT_INDEX_WIDTH,
            );
            failures += coerced.failures;
            Column::new(name, ColumnData::Integer(coerced.values))
        })
        .collect();

    let mut table = ResultTable::new(key, columns)?.with_coercion_failures(failures);
    table.sort_by_key();
    Ok(table)
}

/// 과거 주가 테이블: 날짜, 가격(실수), 거래량(정수) 컬럼으로 변환합니다.
pub fn history_table(raw: &RawTable) -> ScrapeResult<ResultTable> {
    let index_of = |name: &str| {
        raw.headers()
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ScrapeError::MissingColumn(name.to_string()))
    };

    let key = Column::new(
        DATE_KEY,
        ColumnData::Date(parse_dates(raw.column(index_of(DATE_KEY)?), HISTORY_DATE_FORMAT)?),
    );

    let mut failures = 0;
    let mut columns = Vec::with_capacity(PRICE_COLUMNS.len() + 1);
    for name in PRICE_COLUMNS {
        let coerced = coerce_floats(raw.column(index_of(name)?));
        failures += coerced.failures;
        columns.push(Column::new(name, ColumnData::Float(coerced.values)));
    }

    let row_numbers: Vec<String> = (0..raw.row_count()).map(|i| i.to_string()).collect();
    let volume = coerce_integers(
        row_numbers.iter().map(String::as_str),
        raw.column(index_of(VOLUME_COLUMN)?),
        VOLUME_INDEX_WIDTH,
    );
    failures += volume.failures;
    columns.push(Column::new(VOLUME_COLUMN, ColumnData::Integer(volume.values)));

    let mut table = ResultTable::new(key, columns)?.with_coercion_failures(failures);
    table.sort_by_key();
    Ok(table)
}

/// 통계 테이블: 레이블/값 텍스트를 페이지 순서대로 유지합니다.
pub fn statistics_table(raw: &RawTable) -> ScrapeResult<ResultTable> {
    let headers = raw.headers();
    let key = Column::new(
        headers[0].clone(),
        ColumnData::Text(raw.column(0).map(str::to_string).collect()),
    );
    let value = Column::new(
        headers[1].clone(),
        ColumnData::Text(raw.column(1).map(str::to_string).collect()),
    );

    ResultTable::new(key, vec![value])
}

/// 중복 헤더에 " (2)", " (3)" 접미사를 붙여 고유하게 만듭니다.
///
/// 페이지에 원래 있던 이름과 겹치는 접미사는 건너뜁니다.
fn unique_headers(headers: &[String]) -> Vec<String> {
    let original: HashSet<&str> = headers.iter().map(String::as_str).collect();
    let mut used: HashSet<String> = HashSet::new();

    headers
        .iter()
        .map(|header| {
            let name = if used.contains(header) {
                (2..)
                    .map(|n| format!("{} ({})", header, n))
                    .find(|candidate| {
                        !used.contains(candidate) && !original.contains(candidate.as_str())
                    })
                    .unwrap_or_else(|| header.clone())
            } else {
                header.clone()
            };
            used.insert(name.clone());
            name
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use finscrape_core::PageKind;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn ctx() -> PageContext {
        PageContext::new(PageKind::BalanceSheet, "AAPL")
    }

    const RENAME: &[(&str, &str)] = &[("Expand All", "Breakdown")];

    #[test]
    fn test_single_chunk_is_header_only() {
        let fragments = strings(&["Expand All", "Q1", "Breakdown2", "Cash", "1,000"]);
        let table = group_fragments(&fragments, 5, RENAME, &ctx()).unwrap();

        assert_eq!(table.column_count(), 5);
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.headers()[0], "Breakdown");
    }

    #[test]
    fn test_second_chunk_adds_row() {
        let fragments = strings(&[
            "Expand All", "Q1", "Breakdown2", "Cash", "1,000",
            "Assets", "1", "2", "3", "4",
        ]);
        let table = group_fragments(&fragments, 5, RENAME, &ctx()).unwrap();

        assert_eq!(table.column_count(), 5);
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.rows()[0][0], "Assets");
    }

    #[test]
    fn test_misaligned_sequence() {
        let fragments = strings(&["Expand All", "Q1", "Q2", "Cash", "1,000", "2,000"]);
        let err = group_fragments(&fragments, 5, RENAME, &ctx()).unwrap_err();

        assert!(matches!(
            err,
            ScrapeError::MisalignedSequence { width: 5, actual: 6, .. }
        ));
    }

    #[test]
    fn test_statement_table_transposes_and_sorts() {
        let fragments = strings(&[
            "Expand All", "12/31/2023", "12/31/2022", "12/31/2021", "12/31/2020",
            "Total Assets", "352,583", "352,755", "351,002", "323,888",
            "Total Debt", "111,088", "-", "124,719", "112,436",
        ]);
        let raw = group_fragments(&fragments, 5, RENAME, &ctx()).unwrap();
        let table = statement_table(&raw).unwrap();

        assert_eq!(table.headers(), vec!["Period", "Total Assets", "Total Debt"]);
        assert_eq!(table.row_count(), 4);

        let periods = table.key().as_periods().unwrap();
        assert_eq!(
            periods[0],
            Period::Date(NaiveDate::from_ymd_opt(2020, 12, 31).unwrap())
        );

        let assets = table.column("Total Assets").unwrap().as_integers().unwrap();
        assert_eq!(assets, &[323_888, 351_002, 352_755, 352_583]);

        let debt = table.column("Total Debt").unwrap().as_integers().unwrap();
        assert_eq!(debt, &[112_436, 124_719, 0, 111_088]);
        assert_eq!(table.coercion_failures(), 1);
    }

    #[test]
    fn test_statement_duplicate_categories_are_disambiguated() {
        let fragments = strings(&[
            "Expand All", "ttm", "12/31/2023",
            "Net Income", "10", "9",
            "Net Income", "8", "7",
        ]);
        let raw = group_fragments(&fragments, 3, RENAME, &ctx()).unwrap();
        let table = statement_table(&raw).unwrap();

        assert_eq!(table.headers(), vec!["Period", "Net Income", "Net Income (2)"]);
        // 날짜가 레이블보다 앞
        assert_eq!(table.column("Net Income").unwrap().as_integers().unwrap(), &[9, 10]);
    }

    #[test]
    fn test_statement_suffix_skips_existing_category() {
        let fragments = strings(&[
            "Expand All", "ttm",
            "A", "1",
            "A", "2",
            "A (2)", "3",
        ]);
        let raw = group_fragments(&fragments, 2, RENAME, &ctx()).unwrap();
        let table = statement_table(&raw).unwrap();

        assert_eq!(table.headers(), vec!["Period", "A", "A (3)", "A (2)"]);
        assert_eq!(table.column("A (3)").unwrap().as_integers().unwrap(), &[2]);
        assert_eq!(table.column("A (2)").unwrap().as_integers().unwrap(), &[3]);
    }

    #[test]
    fn test_history_table() {
        let fragments = strings(&[
            "Date", "Open", "High", "Low", "Close*", "Adj Close**", "Volume",
            "Mar 15, 2024", "10.0", "11.0", "9.5", "10.5", "10.4", "1,200",
            "Mar 14, 2024", "Dividend", "Dividend", "Dividend", "Dividend", "Dividend", "Dividend",
            "Mar 13, 2024", "9.0", "10.0", "8.5", "9.5", "9.4", "900",
        ]);
        let rename = &[("Close*", "Close"), ("Adj Close**", "Adj Close")];
        let ctx = PageContext::new(PageKind::History, "MSFT");
        let raw = group_fragments(&fragments, 7, rename, &ctx).unwrap();
        let table = history_table(&raw).unwrap();

        assert_eq!(
            table.headers(),
            vec!["Date", "Open", "High", "Low", "Close", "Adj Close", "Volume"]
        );
        let dates = table.key().as_dates().unwrap();
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2024, 3, 13).unwrap());
        assert_eq!(table.column("Close").unwrap().as_floats().unwrap(), &[9.5, 0.0, 10.5]);
        assert_eq!(table.column("Volume").unwrap().as_integers().unwrap(), &[900, 0, 1200]);
        assert_eq!(table.coercion_failures(), 6);
    }

    #[test]
    fn test_history_missing_column() {
        let fragments = strings(&["Date", "Open", "Mar 15, 2024", "1.0"]);
        let ctx = PageContext::new(PageKind::History, "MSFT");
        let raw = group_fragments(&fragments, 2, &[], &ctx).unwrap();

        assert!(matches!(history_table(&raw), Err(ScrapeError::MissingColumn(_))));
    }
}
