//! 추출 테이블 타입.
//!
//! - [`RawTable`]: 조각 청크로 만든 문자열 셀 테이블 (중간 산출물)
//! - [`ResultTable`]: 컬럼별로 타입이 정해진 최종 결과 테이블

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{ScrapeError, ScrapeResult};

/// 재무제표 기간 헤더 형식 (예: "12/31/2023")
pub const PERIOD_DATE_FORMAT: &str = "%m/%d/%Y";

/// 출력용 날짜 형식
pub const OUTPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// 재무제표 기간.
///
/// 날짜로 파싱되는 헤더는 `Date`, 그 외(`ttm` 등)는 `Label`입니다.
/// 정렬 시 모든 날짜가 레이블보다 앞에 옵니다.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Period {
    Date(NaiveDate),
    Label(String),
}

impl Period {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        match NaiveDate::parse_from_str(text, PERIOD_DATE_FORMAT) {
            Ok(date) => Self::Date(date),
            Err(_) => Self::Label(text.to_string()),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(date) => write!(f, "{}", date.format(OUTPUT_DATE_FORMAT)),
            Self::Label(label) => f.write_str(label),
        }
    }
}

/// 문자열 셀 테이블.
///
/// 헤더 행과 데이터 행을 보관하며, 모든 행의 길이는 헤더 길이와 같습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// 조각을 `width`개씩 묶고 첫 청크를 헤더로 승격합니다.
    ///
    /// 조각 수가 `width`의 배수가 아니거나 비어 있으면 `None`을 반환합니다.
    pub fn from_chunks(fragments: &[String], width: usize) -> Option<Self> {
        if width == 0 || fragments.is_empty() || fragments.len() % width != 0 {
            return None;
        }

        let mut chunks = fragments.chunks_exact(width).map(<[String]>::to_vec);
        let headers = chunks.next()?;

        Some(Self {
            headers,
            rows: chunks.collect(),
        })
    }

    /// 고정 헤더를 사용하고 모든 청크를 데이터 행으로 취급합니다.
    pub fn with_headers(headers: Vec<String>, fragments: &[String]) -> Option<Self> {
        let width = headers.len();
        if width == 0 || fragments.len() % width != 0 {
            return None;
        }

        Some(Self {
            headers,
            rows: fragments.chunks_exact(width).map(<[String]>::to_vec).collect(),
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// 헤더 이름을 바꿉니다. 매핑에 없는 헤더는 그대로 둡니다.
    pub fn rename_headers(&mut self, mapping: &[(&str, &str)]) {
        for header in &mut self.headers {
            if let Some((_, to)) = mapping.iter().find(|(from, _)| from == header) {
                *header = (*to).to_string();
            }
        }
    }

    /// `index`번째 컬럼의 셀을 행 순서대로 반환합니다.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .filter_map(move |row| row.get(index).map(String::as_str))
    }

    /// 첫 컬럼을 새 헤더로 삼아 행과 열을 뒤바꿉니다.
    ///
    /// 원래 헤더의 나머지 값(기간)은 새 첫 컬럼이 되며, 그 헤더 이름은
    /// `key_name`입니다.
    pub fn transpose(&self, key_name: &str) -> RawTable {
        let mut headers = Vec::with_capacity(self.rows.len() + 1);
        headers.push(key_name.to_string());
        headers.extend(self.rows.iter().map(|row| row[0].clone()));

        let rows = (1..self.headers.len())
            .map(|col| {
                let mut row = Vec::with_capacity(self.rows.len() + 1);
                row.push(self.headers[col].clone());
                row.extend(self.rows.iter().map(|r| r[col].clone()));
                row
            })
            .collect();

        RawTable { headers, rows }
    }
}

/// 타입이 정해진 컬럼 데이터.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnData {
    Integer(Vec<i64>),
    Float(Vec<f64>),
    Date(Vec<NaiveDate>),
    Period(Vec<Period>),
    Text(Vec<String>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            Self::Integer(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Date(v) => v.len(),
            Self::Period(v) => v.len(),
            Self::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cell(&self, index: usize) -> Option<Cell<'_>> {
        match self {
            Self::Integer(v) => v.get(index).copied().map(Cell::Integer),
            Self::Float(v) => v.get(index).copied().map(Cell::Float),
            Self::Date(v) => v.get(index).copied().map(Cell::Date),
            Self::Period(v) => v.get(index).map(Cell::Period),
            Self::Text(v) => v.get(index).map(|s| Cell::Text(s.as_str())),
        }
    }

    fn compare(&self, a: usize, b: usize) -> Ordering {
        match self {
            Self::Integer(v) => v[a].cmp(&v[b]),
            Self::Float(v) => v[a].total_cmp(&v[b]),
            Self::Date(v) => v[a].cmp(&v[b]),
            Self::Period(v) => v[a].cmp(&v[b]),
            Self::Text(v) => v[a].cmp(&v[b]),
        }
    }

    fn reorder(&mut self, order: &[usize]) {
        fn apply<T: Clone>(values: &mut Vec<T>, order: &[usize]) {
            *values = order.iter().map(|&i| values[i].clone()).collect();
        }

        match self {
            Self::Integer(v) => apply(v, order),
            Self::Float(v) => apply(v, order),
            Self::Date(v) => apply(v, order),
            Self::Period(v) => apply(v, order),
            Self::Text(v) => apply(v, order),
        }
    }
}

/// 단일 셀 값 참조.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
    Period(&'a Period),
    Text(&'a str),
}

impl fmt::Display for Cell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Date(d) => write!(f, "{}", d.format(OUTPUT_DATE_FORMAT)),
            Self::Period(p) => write!(f, "{}", p),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// 이름이 있는 컬럼.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_integers(&self) -> Option<&[i64]> {
        match &self.data {
            ColumnData::Integer(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_floats(&self) -> Option<&[f64]> {
        match &self.data {
            ColumnData::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_dates(&self) -> Option<&[NaiveDate]> {
        match &self.data {
            ColumnData::Date(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_periods(&self) -> Option<&[Period]> {
        match &self.data {
            ColumnData::Period(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_texts(&self) -> Option<&[String]> {
        match &self.data {
            ColumnData::Text(v) => Some(v),
            _ => None,
        }
    }
}

/// 최종 결과 테이블.
///
/// 키 컬럼(`Breakdown`, `Date`, `Period` 등) 하나와 데이터 컬럼들로 구성되며,
/// 모든 컬럼의 길이는 같고 컬럼 이름은 고유합니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultTable {
    key: Column,
    columns: Vec<Column>,
    /// 숫자로 변환하지 못해 0으로 대체된 셀 수
    coercion_failures: usize,
}

impl ResultTable {
    pub fn new(key: Column, columns: Vec<Column>) -> ScrapeResult<Self> {
        let rows = key.len();
        if let Some(col) = columns.iter().find(|c| c.len() != rows) {
            return Err(ScrapeError::Parse(format!(
                "컬럼 '{}' 길이 {}가 키 컬럼 길이 {}와 다릅니다",
                col.name,
                col.len(),
                rows
            )));
        }

        let mut seen = HashSet::with_capacity(columns.len() + 1);
        for name in std::iter::once(&key.name).chain(columns.iter().map(|c| &c.name)) {
            if !seen.insert(name.as_str()) {
                return Err(ScrapeError::Parse(format!("중복 컬럼 이름: {}", name)));
            }
        }

        Ok(Self {
            key,
            columns,
            coercion_failures: 0,
        })
    }

    pub fn with_coercion_failures(mut self, count: usize) -> Self {
        self.coercion_failures = count;
        self
    }

    pub fn key(&self) -> &Column {
        &self.key
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// 키 컬럼을 포함한 전체 헤더
    pub fn headers(&self) -> Vec<&str> {
        std::iter::once(self.key.name.as_str())
            .chain(self.columns.iter().map(|c| c.name.as_str()))
            .collect()
    }

    pub fn row_count(&self) -> usize {
        self.key.len()
    }

    pub fn coercion_failures(&self) -> usize {
        self.coercion_failures
    }

    /// 이름으로 컬럼 조회 (키 컬럼 포함)
    pub fn column(&self, name: &str) -> Option<&Column> {
        if self.key.name == name {
            return Some(&self.key);
        }
        self.columns.iter().find(|c| c.name == name)
    }

    /// `index`번째 행의 셀 (키 컬럼 먼저)
    pub fn row(&self, index: usize) -> Option<Vec<Cell<'_>>> {
        std::iter::once(&self.key)
            .chain(self.columns.iter())
            .map(|c| c.data.cell(index))
            .collect()
    }

    /// 키 컬럼 오름차순으로 행을 정렬합니다 (안정 정렬).
    pub fn sort_by_key(&mut self) {
        let mut order: Vec<usize> = (0..self.row_count()).collect();
        order.sort_by(|&a, &b| self.key.data.compare(a, b));

        self.key.data.reorder(&order);
        for col in &mut self.columns {
            col.data.reorder(&order);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_chunks_promotes_header() {
        let fragments = strings(&[
            "Expand All", "12/31/2023", "12/31/2022", "12/31/2021", "12/31/2020",
            "Cash", "1,000", "2,000", "3,000", "4,000",
        ]);
        let table = RawTable::from_chunks(&fragments, 5).unwrap();

        assert_eq!(table.column_count(), 5);
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.headers()[0], "Expand All");
        assert_eq!(table.rows()[0][0], "Cash");
    }

    #[test]
    fn test_from_chunks_rejects_misaligned() {
        let fragments = strings(&["a", "b", "c"]);
        assert!(RawTable::from_chunks(&fragments, 2).is_none());
        assert!(RawTable::from_chunks(&[], 2).is_none());
    }

    #[test]
    fn test_rename_and_transpose() {
        let fragments = strings(&[
            "Expand All", "12/31/2023", "12/31/2022",
            "Cash", "10", "20",
            "Debt", "30", "40",
        ]);
        let mut table = RawTable::from_chunks(&fragments, 3).unwrap();
        table.rename_headers(&[("Expand All", "Breakdown")]);
        assert_eq!(table.headers()[0], "Breakdown");

        let t = table.transpose("Period");
        assert_eq!(t.headers(), &strings(&["Period", "Cash", "Debt"])[..]);
        assert_eq!(t.rows()[0], strings(&["12/31/2023", "10", "30"]));
        assert_eq!(t.rows()[1], strings(&["12/31/2022", "20", "40"]));
    }

    #[test]
    fn test_period_ordering() {
        let mut periods = vec![
            Period::parse("ttm"),
            Period::parse("12/31/2023"),
            Period::parse("9/30/2022"),
        ];
        periods.sort();

        assert_eq!(
            periods[0],
            Period::Date(NaiveDate::from_ymd_opt(2022, 9, 30).unwrap())
        );
        assert_eq!(periods[2], Period::Label("ttm".to_string()));
    }

    #[test]
    fn test_result_table_sort_by_key() {
        let key = Column::new(
            "Date",
            ColumnData::Date(vec![
                NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            ]),
        );
        let close = Column::new("Close", ColumnData::Float(vec![2.0, 1.0]));
        let mut table = ResultTable::new(key, vec![close]).unwrap();
        table.sort_by_key();

        assert_eq!(table.column("Close").unwrap().as_floats().unwrap(), &[1.0, 2.0]);
        assert_eq!(table.headers(), vec!["Date", "Close"]);
        assert_eq!(table.row(0).unwrap()[0].to_string(), "2024-03-01");
    }

    #[test]
    fn test_result_table_rejects_duplicates_and_ragged() {
        let key = Column::new("Date", ColumnData::Text(vec!["a".into()]));
        let dup = Column::new("Date", ColumnData::Integer(vec![1]));
        assert!(ResultTable::new(key.clone(), vec![dup]).is_err());

        let ragged = Column::new("Close", ColumnData::Integer(vec![1, 2]));
        assert!(ResultTable::new(key, vec![ragged]).is_err());
    }
}
