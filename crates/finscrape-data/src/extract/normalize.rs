//! 조각이 모자란 특수 행을 행 너비에 맞게 채웁니다.
//!
//! 과거 주가 페이지의 배당 행은 날짜와 "Dividend" 레이블 두 조각만 내보내므로,
//! 레이블 뒤에 복사본을 끼워 넣어 다른 행과 같은 너비로 맞춥니다.

use finscrape_core::ScrapeResult;
use tracing::debug;

use super::PageContext;

/// 배당 이벤트 행 레이블
pub const DIVIDEND_LABEL: &str = "Dividend";

/// 한 번에 보정하는 최대 레이블 행 수
pub const MAX_LABEL_ROWS: usize = 2;

/// 레이블 행이 원래 내보내는 조각 수 (날짜 + 레이블)
const LABEL_ROW_FRAGMENTS: usize = 2;

/// `label`이 나올 때마다 뒤에 `width - 2`개의 복사본을 끼워 넣습니다.
///
/// 레이블이 없으면 그대로 반환합니다. 레이블이 [`MAX_LABEL_ROWS`]번을 넘게
/// 나오면 조용히 어긋나는 대신 `MisalignedSequence`를 반환합니다. 이미 보정된
/// 시퀀스에 다시 적용하면 레이블이 늘어나 있으므로 같은 에러가 납니다.
pub fn pad_label_rows(
    fragments: Vec<String>,
    label: &str,
    width: usize,
    ctx: &PageContext,
) -> ScrapeResult<Vec<String>> {
    let occurrences = fragments.iter().filter(|f| *f == label).count();
    if occurrences == 0 {
        return Ok(fragments);
    }

    if occurrences > MAX_LABEL_ROWS {
        return Err(ctx.misaligned(
            width,
            fragments.len(),
            format!(
                "'{}' 레이블이 {}번 나옴 (최대 {})",
                label, occurrences, MAX_LABEL_ROWS
            ),
        ));
    }

    let pad = width.saturating_sub(LABEL_ROW_FRAGMENTS);
    let mut padded = Vec::with_capacity(fragments.len() + occurrences * pad);

    for fragment in fragments {
        let is_label = fragment == label;
        padded.push(fragment);
        if is_label {
            padded.extend(std::iter::repeat(label.to_string()).take(pad));
        }
    }

    debug!(occurrences, pad, fragments = padded.len(), "padded label rows");

    Ok(padded)
}
