//! 텍스트 셀을 숫자/날짜로 변환하는 규칙.
//!
//! 각 셀은 행 인덱스 레이블을 고정 너비로 앞에 붙인 한 줄로 렌더링되고,
//! 천 단위 구분자를 지운 뒤 같은 너비만큼 앞을 잘라내어 숫자로 파싱됩니다.
//! 파싱에 실패한 셀은 0이 되며 실패 수는 따로 집계됩니다.

use chrono::NaiveDate;
use finscrape_core::{ScrapeError, ScrapeResult};

/// 재무제표 수치 앞 행 인덱스(기간) 너비
pub const STATEMENT_INDEX_WIDTH: usize = 10;

/// 거래량 앞 행 인덱스(행 번호) 너비
pub const VOLUME_INDEX_WIDTH: usize = 3;

/// 과거 주가 페이지 날짜 형식 (예: "Mar 15, 2024")
pub const HISTORY_DATE_FORMAT: &str = "%b %d, %Y";

const THOUSANDS_SEPARATOR: char = ',';

/// 변환된 컬럼과 0으로 대체된 셀 수.
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced<T> {
    pub values: Vec<T>,
    pub failures: usize,
}

/// 행 인덱스 레이블을 정확히 `width` 글자로 맞춰 값 앞에 붙입니다.
pub fn render_line(index_label: &str, value: &str, width: usize) -> String {
    let label: String = index_label
        .chars()
        .filter(|c| *c != THOUSANDS_SEPARATOR)
        .take(width)
        .collect();
    format!("{:<width$}{}", label, value, width = width)
}

/// 한 줄 앞의 `width` 글자(행 인덱스 레이블)를 잘라냅니다.
pub fn strip_row_index(line: &str, width: usize) -> &str {
    match line.char_indices().nth(width) {
        Some((offset, _)) => &line[offset..],
        None => "",
    }
}

fn strip_separators(text: &str) -> String {
    text.chars().filter(|c| *c != THOUSANDS_SEPARATOR).collect()
}

/// 렌더링된 한 줄을 정수로 변환합니다. 소수는 버림합니다.
pub fn parse_integer_line(line: &str, width: usize) -> Option<i64> {
    let cleaned = strip_separators(line);
    let token = strip_row_index(&cleaned, width).trim();

    token
        .parse::<i64>()
        .ok()
        .or_else(|| token.parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| v as i64))
}

/// 실수 셀을 변환합니다.
pub fn parse_float(text: &str) -> Option<f64> {
    strip_separators(text).trim().parse::<f64>().ok()
}

/// 행 인덱스 레이블과 값을 짝지어 정수 컬럼으로 변환합니다.
pub fn coerce_integers<'a, L, V>(index_labels: L, values: V, width: usize) -> Coerced<i64>
where
    L: IntoIterator<Item = &'a str>,
    V: IntoIterator<Item = &'a str>,
{
    let mut failures = 0;
    let values = index_labels
        .into_iter()
        .zip(values)
        .map(|(label, value)| {
            parse_integer_line(&render_line(label, value, width), width).unwrap_or_else(|| {
                failures += 1;
                0
            })
        })
        .collect();

    Coerced { values, failures }
}

/// 실수 컬럼으로 변환합니다.
pub fn coerce_floats<'a, V>(values: V) -> Coerced<f64>
where
    V: IntoIterator<Item = &'a str>,
{
    let mut failures = 0;
    let values = values
        .into_iter()
        .map(|value| {
            parse_float(value).unwrap_or_else(|| {
                failures += 1;
                0.0
            })
        })
        .collect();

    Coerced { values, failures }
}

/// 날짜 키 컬럼을 변환합니다. 키는 0으로 대체할 수 없으므로 실패는 에러입니다.
pub fn parse_dates<'a, V>(values: V, format: &str) -> ScrapeResult<Vec<NaiveDate>>
where
    V: IntoIterator<Item = &'a str>,
{
    values
        .into_iter()
        .map(|value| {
            NaiveDate::parse_from_str(value.trim(), format).map_err(|e| {
                ScrapeError::Parse(format!("날짜 '{}' 파싱 실패 ({}): {}", value, format, e))
            })
        })
        .collect()
}
