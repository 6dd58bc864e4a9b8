//! 관련 데이터 구간만 남기도록 조각 시퀀스를 자릅니다.

use finscrape_core::ScrapeResult;
use tracing::{debug, warn};

use super::PageContext;

/// 데이터 구간 끝 표식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator<'a> {
    /// 표식 자체가 마지막 데이터 조각 (표식 포함)
    Inclusive(&'a str),
    /// 표식부터 뒤는 모두 부가 문구 (표식 제외)
    Exclusive(&'a str),
}

impl<'a> Terminator<'a> {
    fn value(&self) -> &'a str {
        match self {
            Self::Inclusive(v) | Self::Exclusive(v) => v,
        }
    }
}

/// 빈 조각을 버리고 `sentinel` 앞과 `terminator` 뒤를 잘라냅니다.
///
/// 조각 앞뒤 공백은 제거됩니다. `sentinel`이 없으면 `SentinelNotFound`,
/// `terminator`가 없으면 경고만 남기고 끝까지 유지합니다.
pub fn trim_fragments<I>(
    fragments: I,
    sentinel: &str,
    terminator: Option<Terminator<'_>>,
    ctx: &PageContext,
) -> ScrapeResult<Vec<String>>
where
    I: IntoIterator<Item = String>,
{
    let mut kept: Vec<String> = fragments
        .into_iter()
        .filter_map(|f| {
            let trimmed = f.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect();

    let start = kept
        .iter()
        .position(|f| f == sentinel)
        .ok_or_else(|| ctx.sentinel_not_found(sentinel))?;
    kept.drain(..start);

    if let Some(terminator) = terminator {
        match kept.iter().position(|f| f == terminator.value()) {
            Some(end) => {
                let keep = match terminator {
                    Terminator::Inclusive(_) => end + 1,
                    Terminator::Exclusive(_) => end,
                };
                kept.truncate(keep);
            }
            None => warn!(
                page = %ctx.page,
                ticker = %ctx.ticker,
                terminator = terminator.value(),
                "terminator not found, keeping trailing fragments"
            ),
        }
    }

    debug!(fragments = kept.len(), "trimmed fragment sequence");

    Ok(kept)
}
