//! 페이지 종류 정의.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 추출 대상 페이지 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageKind {
    /// 재무상태표
    BalanceSheet,
    /// 손익계산서
    IncomeStatement,
    /// 현금흐름표
    CashFlow,
    /// 주요 통계
    Statistics,
    /// 과거 주가
    History,
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BalanceSheet => write!(f, "balance-sheet"),
            Self::IncomeStatement => write!(f, "financials"),
            Self::CashFlow => write!(f, "cash-flow"),
            Self::Statistics => write!(f, "key-statistics"),
            Self::History => write!(f, "history"),
        }
    }
}

/// 재무제표 종류.
///
/// 재무상태표는 기간 컬럼이 4개(행 너비 5), 손익계산서와 현금흐름표는
/// TTM 컬럼이 추가되어 5개(행 너비 6)입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StatementKind {
    #[default]
    BalanceSheet,
    Financials,
    CashFlow,
}

impl StatementKind {
    /// 견적 페이지 URL 경로 조각
    pub fn slug(&self) -> &'static str {
        match self {
            Self::BalanceSheet => "balance-sheet",
            Self::Financials => "financials",
            Self::CashFlow => "cash-flow",
        }
    }

    /// 한 논리 행을 구성하는 조각 수
    pub fn row_width(&self) -> usize {
        match self {
            Self::BalanceSheet => 5,
            Self::Financials | Self::CashFlow => 6,
        }
    }

    pub fn page_kind(&self) -> PageKind {
        match self {
            Self::BalanceSheet => PageKind::BalanceSheet,
            Self::Financials => PageKind::IncomeStatement,
            Self::CashFlow => PageKind::CashFlow,
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for StatementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "balance-sheet" | "balance" | "bs" => Ok(Self::BalanceSheet),
            "financials" | "income" | "income-statement" => Ok(Self::Financials),
            "cash-flow" | "cashflow" | "cf" => Ok(Self::CashFlow),
            _ => Err(format!(
                "Unknown statement type: {}. Supported: balance-sheet, financials, cash-flow",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_kind_from_str() {
        assert_eq!(
            "balance-sheet".parse::<StatementKind>().unwrap(),
            StatementKind::BalanceSheet
        );
        assert_eq!(
            "FINANCIALS".parse::<StatementKind>().unwrap(),
            StatementKind::Financials
        );
        assert_eq!("cf".parse::<StatementKind>().unwrap(), StatementKind::CashFlow);
        assert!("ledger".parse::<StatementKind>().is_err());
    }

    #[test]
    fn test_row_widths() {
        assert_eq!(StatementKind::BalanceSheet.row_width(), 5);
        assert_eq!(StatementKind::Financials.row_width(), 6);
        assert_eq!(StatementKind::CashFlow.row_width(), 6);
    }

    #[test]
    fn test_page_kind_display() {
        assert_eq!(StatementKind::Financials.page_kind().to_string(), "financials");
        assert_eq!(PageKind::Statistics.to_string(), "key-statistics");
    }
}
