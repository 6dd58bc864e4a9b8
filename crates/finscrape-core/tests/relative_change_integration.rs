//! 과거 주가 테이블과 상대 변화율 통합 테스트

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use finscrape_core::{
    relative_change, shift_to_weekday, Column, ColumnData, ResultTable, ScrapeError,
    ShiftDirection,
};

/// `start`부터 `end`까지 평일마다 종가가 1씩 오르는 테이블 (역순으로 만든 뒤 정렬)
fn weekday_prices(start: NaiveDate, end: NaiveDate) -> ResultTable {
    let mut dates = Vec::new();
    let mut day = start;
    while day <= end {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            dates.push(day);
        }
        day += Duration::days(1);
    }
    let closes: Vec<f64> = (0..dates.len()).map(|i| 100.0 + i as f64).collect();

    dates.reverse();
    let closes: Vec<f64> = closes.into_iter().rev().collect();

    let mut table = ResultTable::new(
        Column::new("Date", ColumnData::Date(dates)),
        vec![Column::new("Close", ColumnData::Float(closes))],
    )
    .unwrap();
    table.sort_by_key();
    table
}

#[test]
fn test_relative_change_over_sorted_history() {
    let today = NaiveDate::from_ymd_opt(2024, 6, 19).unwrap();
    let table = weekday_prices(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), today);

    let change = relative_change(&table, 1, today).unwrap();

    assert_eq!(change.reference_date, NaiveDate::from_ymd_opt(2024, 5, 20).unwrap());
    assert!(change.new_close > change.old_close);
    assert!(change.percent > 0.0);
    assert!(change.to_string().starts_with("Relative difference 1 months: "));
    assert!(change.to_string().ends_with("[compared to 2024-05-20]"));
}

#[test]
fn test_too_far_back_has_no_data() {
    let today = NaiveDate::from_ymd_opt(2024, 6, 19).unwrap();
    let table = weekday_prices(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), today);

    let err = relative_change(&table, 12, today).unwrap_err();
    assert!(matches!(err, ScrapeError::NoDataForPeriod));
}

#[test]
fn test_reference_window_is_weekday_bounded() {
    // 2024-06-15 (토) 기준 한 달 전 = 2024-05-15 (수)
    let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let recent = shift_to_weekday(today - Duration::days(1), ShiftDirection::Backward);
    assert_eq!(recent, NaiveDate::from_ymd_opt(2024, 6, 14).unwrap());

    let table = weekday_prices(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), today);
    let change = relative_change(&table, 1, today).unwrap();

    assert_eq!(change.reference_date, NaiveDate::from_ymd_opt(2024, 5, 15).unwrap());
    // 5/15 종가: 5/1부터 평일 11번째 → 110
    assert_eq!(change.old_close, 110.0);
}
