//! 주말 날짜를 평일로 옮기는 달력 유틸리티.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// 주말 보정 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShiftDirection {
    /// 다음 월요일로 이동
    #[default]
    Forward,
    /// 직전 금요일로 이동
    Backward,
}

/// 주말이면 평일로 옮기고, 평일이면 그대로 반환합니다.
///
/// - `Forward`: 토요일 +2일, 일요일 +1일
/// - `Backward`: 토요일 -1일, 일요일 -2일
///
/// 주말 날짜는 앞뒤로 보정해도 원래 날짜로 돌아오지 않습니다.
pub fn shift_to_weekday(date: NaiveDate, direction: ShiftDirection) -> NaiveDate {
    let offset = match (date.weekday(), direction) {
        (Weekday::Sat, ShiftDirection::Forward) => 2,
        (Weekday::Sun, ShiftDirection::Forward) => 1,
        (Weekday::Sat, ShiftDirection::Backward) => -1,
        (Weekday::Sun, ShiftDirection::Backward) => -2,
        _ => 0,
    };

    date + Duration::days(offset)
}
