//! 마크업 노드 추상화.
//!
//! 추출 알고리즘은 [`MarkupNode`] 트레이트만 사용하며, 실제 HTML 파싱은
//! `scraper` 크레이트가 담당합니다.

use finscrape_core::{ScrapeError, ScrapeResult};
use scraper::{ElementRef, Html, Selector};

/// 파싱된 문서 트리의 노드 핸들.
pub trait MarkupNode: Sized {
    /// 노드 고유의 텍스트.
    ///
    /// 자식이 정확히 하나일 때만 값이 있습니다. 자식이 텍스트면 그 텍스트,
    /// 요소면 그 요소의 고유 텍스트입니다.
    fn own_text(&self) -> Option<String>;

    /// 모든 하위 텍스트를 문서 순서대로 이어 붙인 값
    fn full_text(&self) -> String;

    /// 이름이 `name`인 속성 값
    fn attribute(&self, name: &str) -> Option<String>;

    /// 태그가 `tag`인 하위 노드 (문서 순서)
    fn find_all(&self, tag: &str) -> ScrapeResult<Vec<Self>>;
}

impl<'a> MarkupNode for ElementRef<'a> {
    fn own_text(&self) -> Option<String> {
        sole_string(*self)
    }

    fn full_text(&self) -> String {
        self.text().collect()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.value().attr(name).map(str::to_string)
    }

    fn find_all(&self, tag: &str) -> ScrapeResult<Vec<Self>> {
        let selector = Selector::parse(tag)
            .map_err(|e| ScrapeError::Parse(format!("잘못된 태그 셀렉터 '{}': {}", tag, e)))?;
        Ok(self.select(&selector).collect())
    }
}

fn sole_string(element: ElementRef<'_>) -> Option<String> {
    let mut children = element.children();
    let child = children.next()?;
    if children.next().is_some() {
        return None;
    }

    if let Some(text) = child.value().as_text() {
        return Some(String::from(&**text));
    }

    ElementRef::wrap(child).and_then(sole_string)
}

/// 원본 문서 텍스트를 파싱합니다.
///
/// 빈 문서는 트리를 만들 수 없으므로 `Parse` 에러입니다.
pub fn parse_document(raw: &str) -> ScrapeResult<Html> {
    if raw.trim().is_empty() {
        return Err(ScrapeError::Parse("빈 문서".to_string()));
    }

    Ok(Html::parse_document(raw))
}
