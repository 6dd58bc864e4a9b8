//! 공통 타입 정의.

pub mod page;
pub mod table;

pub use page::{PageKind, StatementKind};
pub use table::{
    Cell, Column, ColumnData, Period, RawTable, ResultTable, OUTPUT_DATE_FORMAT,
    PERIOD_DATE_FORMAT,
};
