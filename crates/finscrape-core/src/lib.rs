//! # Finscrape Core
//!
//! 금융 정보 페이지 스크래핑의 핵심 타입과 공통 인프라를 제공합니다:
//! - 추출 테이블 타입 (`RawTable`, `ResultTable`)
//! - 페이지/재무제표 종류
//! - 에러 분류 체계
//! - 설정 관리
//! - 로깅 인프라
//! - 평일 보정 및 상대 변화율 계산

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
