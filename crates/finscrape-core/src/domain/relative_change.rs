//! 과거 종가 대비 상대 변화율 계산.

use std::fmt;

use chrono::{Duration, Months, NaiveDate};
use tracing::debug;

use super::calendar::{shift_to_weekday, ShiftDirection};
use crate::error::{ScrapeError, ScrapeResult};
use crate::types::{Column, ResultTable, OUTPUT_DATE_FORMAT};

/// 상대 변화율 계산 결과.
#[derive(Debug, Clone, PartialEq)]
pub struct RelativeChange {
    /// 비교 기간 (개월)
    pub months_back: u32,
    /// 비교 기준 날짜 (평일로 보정된 N개월 전)
    pub reference_date: NaiveDate,
    /// 기준 구간 종가
    pub old_close: f64,
    /// 최근 거래일 종가
    pub new_close: f64,
    /// 변화율 (%, 소수점 둘째 자리 반올림)
    pub percent: f64,
}

impl fmt::Display for RelativeChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Relative difference {} months: ", self.months_back)?;
        // 정수 값도 소수점 한 자리 표시 (25 → 25.0)
        if self.percent.fract() == 0.0 {
            write!(f, "{:.1}%", self.percent)?;
        } else {
            write!(f, "{}%", self.percent)?;
        }
        write!(f, " [compared to {}]", self.reference_date.format(OUTPUT_DATE_FORMAT))
    }
}

/// 최근 거래일 종가와 `months_back`개월 전 종가의 변화율을 계산합니다.
///
/// `table`은 `Date`(날짜)와 `Close`(실수) 컬럼을 가진 날짜 오름차순 테이블입니다.
///
/// - 최근 종가: `today - 1일`을 직전 평일로 보정한 날의 하루 전 이후 첫 행
/// - 기준 종가: `today - N개월`을 평일로 보정한 날 앞뒤 평일 사이(양 끝 제외)의 첫 행
///
/// 종가가 0인 행(배당 행 등 숫자 변환에 실패한 행)은 거래일로 보지 않습니다.
pub fn relative_change(
    table: &ResultTable,
    months_back: u32,
    today: NaiveDate,
) -> ScrapeResult<RelativeChange> {
    let dates = table
        .column("Date")
        .and_then(Column::as_dates)
        .ok_or_else(|| ScrapeError::MissingColumn("Date".to_string()))?;
    let closes = table
        .column("Close")
        .and_then(Column::as_floats)
        .ok_or_else(|| ScrapeError::MissingColumn("Close".to_string()))?;

    let recent_day = shift_to_weekday(today - Duration::days(1), ShiftDirection::Backward);

    let reference_date = today
        .checked_sub_months(Months::new(months_back))
        .map(|d| shift_to_weekday(d, ShiftDirection::Forward))
        .ok_or(ScrapeError::NoDataForPeriod)?;
    let upper = shift_to_weekday(reference_date + Duration::days(1), ShiftDirection::Forward);
    let lower = shift_to_weekday(reference_date - Duration::days(1), ShiftDirection::Backward);

    debug!(
        %recent_day,
        %reference_date,
        %lower,
        %upper,
        "relative change window"
    );

    let trading_days = || {
        dates
            .iter()
            .zip(closes.iter())
            .filter(|(_, close)| **close != 0.0)
    };

    let old_close = trading_days()
        .find(|(date, _)| **date > lower && **date < upper)
        .map(|(_, close)| *close)
        .ok_or(ScrapeError::NoDataForPeriod)?;

    let cutoff = recent_day - Duration::days(1);
    let new_close = trading_days()
        .find(|(date, _)| **date > cutoff)
        .map(|(_, close)| *close)
        .ok_or(ScrapeError::NoDataForPeriod)?;

    let percent = ((new_close - old_close) / old_close * 100.0 * 100.0).round() / 100.0;

    Ok(RelativeChange {
        months_back,
        reference_date,
        old_close,
        new_close,
        percent,
    })
}
