//! 노드 트리를 평탄한 텍스트 조각 시퀀스로 변환합니다.

use finscrape_core::ScrapeResult;

use super::PageContext;
use crate::markup::MarkupNode;

/// 툴팁 속성 이름
const TITLE_ATTRIBUTE: &str = "title";

/// `tag` 노드마다 고유 텍스트와 (다를 경우) title 속성 값을 순서대로 내보냅니다.
///
/// 고유 텍스트나 title이 없는 노드는 해당 조각을 건너뜁니다. 노드 목록을 소유한
/// 한 번 소비용 이터레이터를 반환합니다.
pub fn flatten_tagged<N: MarkupNode>(
    root: &N,
    tag: &str,
) -> ScrapeResult<impl Iterator<Item = String>> {
    let nodes = root.find_all(tag)?;
    Ok(nodes.into_iter().flat_map(|node| node_fragments(&node)))
}

fn node_fragments<N: MarkupNode>(node: &N) -> impl Iterator<Item = String> {
    let text = node.own_text();
    let title = node.attribute(TITLE_ATTRIBUTE);
    let title = if title != text { title } else { None };

    text.into_iter().chain(title)
}

/// 모든 `table`의 `tr` 행에서 첫 번째와 두 번째 `td` 텍스트를 순서대로 내보냅니다.
///
/// 통계 행은 항상 레이블/값 쌍이므로 `td`가 두 개 미만인 행은 그 위치에서
/// `StructuralRowError`를 내보냅니다. 행 노드 목록을 소유한 한 번 소비용
/// 이터레이터를 반환합니다.
pub fn flatten_label_value_rows<'c, N: MarkupNode + 'c>(
    root: &N,
    ctx: &'c PageContext,
) -> ScrapeResult<impl Iterator<Item = ScrapeResult<String>> + 'c> {
    let mut rows = Vec::new();
    for table in root.find_all("table")? {
        rows.extend(table.find_all("tr")?);
    }

    Ok(rows
        .into_iter()
        .enumerate()
        .flat_map(move |(index, tr)| row_fragments(&tr, index + 1, ctx)))
}

fn row_fragments<N: MarkupNode>(
    tr: &N,
    row: usize,
    ctx: &PageContext,
) -> Vec<ScrapeResult<String>> {
    let cells = match tr.find_all("td") {
        Ok(cells) => cells,
        Err(e) => return vec![Err(e)],
    };

    match cells.as_slice() {
        [label, value, ..] => vec![
            Ok(label.full_text().trim().to_string()),
            Ok(value.full_text().trim().to_string()),
        ],
        cells => vec![Err(ctx.structural_row(row, cells.len()))],
    }
}
