//! 도메인 유틸리티.
//!
//! - 주말 날짜 평일 보정
//! - 과거 종가 대비 상대 변화율

pub mod calendar;
pub mod relative_change;

pub use calendar::{shift_to_weekday, ShiftDirection};
pub use relative_change::{relative_change, RelativeChange};
