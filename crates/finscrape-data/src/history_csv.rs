//! 과거 주가 CSV 다운로드 파싱.
//!
//! ```text
//! Date,Open,High,Low,Close,Adj Close,Volume
//! 2024-03-13,9.0,10.0,8.5,9.5,9.4,900
//! ```
//!
//! 헤더의 공백은 `_`로 바뀌어 `Adj Close`는 `Adj_Close`가 됩니다.

use chrono::NaiveDate;
use csv::ReaderBuilder;
use finscrape_core::{Column, ColumnData, ResultTable, ScrapeError, ScrapeResult};
use tracing::{debug, warn};

use crate::extract::coerce::{coerce_floats, coerce_integers, parse_dates, VOLUME_INDEX_WIDTH};
use crate::extract::group::{DATE_KEY, VOLUME_COLUMN};

/// CSV 날짜 형식
pub const CSV_DATE_FORMAT: &str = "%Y-%m-%d";

/// 헤더 이름의 공백을 `_`로 바꿉니다.
pub fn normalize_header(header: &str) -> String {
    header.trim().replace(' ', "_")
}

/// CSV 본문을 날짜 오름차순 결과 테이블로 변환합니다.
///
/// `Date`는 키 컬럼, `Volume`은 정수, 나머지는 실수 컬럼입니다.
/// 숫자가 아닌 셀(`null` 등)은 0이 되며 실패 수에 집계됩니다.
pub fn parse_history_csv(text: &str) -> ScrapeResult<ResultTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ScrapeError::Parse(format!("CSV 헤더 읽기 실패: {}", e)))?
        .iter()
        .map(normalize_header)
        .collect();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (line, record) in reader.records().enumerate() {
        let record =
            record.map_err(|e| ScrapeError::Parse(format!("CSV {}행 읽기 실패: {}", line + 2, e)))?;
        for (column, value) in cells.iter_mut().zip(record.iter()) {
            column.push(value.to_string());
        }
    }

    let date_index = headers
        .iter()
        .position(|h| h == DATE_KEY)
        .ok_or_else(|| ScrapeError::MissingColumn(DATE_KEY.to_string()))?;
    let dates: Vec<NaiveDate> =
        parse_dates(cells[date_index].iter().map(String::as_str), CSV_DATE_FORMAT)?;
    let row_numbers: Vec<String> = (0..dates.len()).map(|i| i.to_string()).collect();

    let mut failures = 0;
    let mut columns = Vec::with_capacity(headers.len().saturating_sub(1));
    for (index, name) in headers.iter().enumerate() {
        if index == date_index {
            continue;
        }

        let values = cells[index].iter().map(String::as_str);
        let data = if name == VOLUME_COLUMN {
            let coerced = coerce_integers(
                row_numbers.iter().map(String::as_str),
                values,
                VOLUME_INDEX_WIDTH,
            );
            failures += coerced.failures;
            ColumnData::Integer(coerced.values)
        } else {
            let coerced = coerce_floats(values);
            failures += coerced.failures;
            ColumnData::Float(coerced.values)
        };
        columns.push(Column::new(name.clone(), data));
    }

    let key = Column::new(DATE_KEY, ColumnData::Date(dates));
    let mut table = ResultTable::new(key, columns)?.with_coercion_failures(failures);
    table.sort_by_key();

    debug!(rows = table.row_count(), "parsed history csv");
    if failures > 0 {
        warn!(failures, "non-numeric csv cells replaced with 0");
    }

    Ok(table)
}
