//! CLI 명령어 구현 모듈.

pub mod change;
pub mod history;
pub mod output;
pub mod plot;
pub mod statement;
pub mod stats;
