//! 과거 종가 차트.
//!
//! 종가 선 그래프에 최고가와 최저가 지점을 다른 색으로 표시합니다.
//! 결과는 JSON(차트 데이터) 또는 SVG 텍스트로 내보낼 수 있습니다.

use std::fmt::{self, Write as _};

use chrono::NaiveDate;
use finscrape_core::{ResultTable, ScrapeError, ScrapeResult, OUTPUT_DATE_FORMAT};
use serde::Serialize;

use crate::extract::group::DATE_KEY;

/// 종가 컬럼 이름
pub const CLOSE_COLUMN: &str = "Close";

/// 선 색상
pub const LINE_COLOR: &str = "navy";

/// 최고가 표시 색상
pub const MAX_COLOR: &str = "mediumseagreen";

/// 최저가 표시 색상
pub const MIN_COLOR: &str = "firebrick";

const MARGIN: f64 = 60.0;

/// 차트 데이터 포인트
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// X축 날짜
    pub date: NaiveDate,
    /// Y축 종가
    pub close: f64,
}

/// 강조 표시 지점
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartMarker {
    pub point: ChartPoint,
    pub color: &'static str,
    pub label: String,
}

/// 종가 차트
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceChart {
    pub title: String,
    pub line_color: &'static str,
    pub points: Vec<ChartPoint>,
    pub max: ChartMarker,
    pub min: ChartMarker,
}

impl PriceChart {
    /// `Date`/`Close` 컬럼이 있는 테이블에서 차트를 만듭니다.
    ///
    /// 종가가 0인 행(변환 실패로 채워진 행)은 제외합니다. 최고/최저가가 여러
    /// 번 나오면 가장 이른 날짜를 표시합니다.
    pub fn from_table(ticker: &str, table: &ResultTable) -> ScrapeResult<Self> {
        let dates = table
            .column(DATE_KEY)
            .and_then(|c| c.as_dates())
            .ok_or_else(|| ScrapeError::MissingColumn(DATE_KEY.to_string()))?;
        let closes = table
            .column(CLOSE_COLUMN)
            .and_then(|c| c.as_floats())
            .ok_or_else(|| ScrapeError::MissingColumn(CLOSE_COLUMN.to_string()))?;

        let points: Vec<ChartPoint> = dates
            .iter()
            .zip(closes)
            .filter(|(_, close)| **close != 0.0)
            .map(|(date, close)| ChartPoint {
                date: *date,
                close: *close,
            })
            .collect();

        let first = points.first().ok_or(ScrapeError::EmptySeries)?;
        let (mut max, mut min) = (first, first);
        for point in &points {
            if point.close > max.close {
                max = point;
            }
            if point.close < min.close {
                min = point;
            }
        }

        let marker = |point: &ChartPoint, color| ChartMarker {
            point: point.clone(),
            color,
            label: format!("{:.2} ({})", point.close, point.date.format(OUTPUT_DATE_FORMAT)),
        };
        let max = marker(max, MAX_COLOR);
        let min = marker(min, MIN_COLOR);

        Ok(Self {
            title: format!("{} Stock price", ticker),
            line_color: LINE_COLOR,
            points,
            max,
            min,
        })
    }

    pub fn to_json(&self) -> ScrapeResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ScrapeError::Parse(format!("차트 직렬화 실패: {}", e)))
    }

    /// SVG 문서로 렌더링합니다.
    pub fn render_svg(&self, width: u32, height: u32) -> ScrapeResult<String> {
        let mut svg = String::new();
        self.write_svg(&mut svg, width, height)
            .map_err(|e| ScrapeError::Parse(format!("차트 렌더링 실패: {}", e)))?;
        Ok(svg)
    }

    fn write_svg(&self, svg: &mut String, width: u32, height: u32) -> fmt::Result {
        let (w, h) = (f64::from(width), f64::from(height));
        let plot_w = (w - 2.0 * MARGIN).max(1.0);
        let plot_h = (h - 2.0 * MARGIN).max(1.0);

        let first_day = self.points.first().map(|p| p.date).unwrap_or_default();
        let span_days = self
            .points
            .last()
            .map(|p| (p.date - first_day).num_days())
            .unwrap_or(0)
            .max(1) as f64;
        let (low, high) = (self.min.point.close, self.max.point.close);
        let range = if high > low { high - low } else { 1.0 };

        let x = |date: NaiveDate| MARGIN + (date - first_day).num_days() as f64 / span_days * plot_w;
        let y = |close: f64| MARGIN + (high - close) / range * plot_h;

        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        )?;
        writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
        writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-family="sans-serif" font-size="16">{}</text>"#,
            w / 2.0,
            MARGIN / 2.0,
            escape(&self.title)
        )?;

        let path: Vec<String> = self
            .points
            .iter()
            .map(|p| format!("{:.2},{:.2}", x(p.date), y(p.close)))
            .collect();
        writeln!(
            svg,
            r#"<polyline fill="none" stroke="{}" stroke-width="1.5" points="{}"/>"#,
            self.line_color,
            path.join(" ")
        )?;

        for marker in [&self.max, &self.min] {
            writeln!(
                svg,
                r#"<circle cx="{:.2}" cy="{:.2}" r="4" fill="{}"><title>{}</title></circle>"#,
                x(marker.point.date),
                y(marker.point.close),
                marker.color,
                escape(&marker.label)
            )?;
        }

        // x축 눈금: 처음과 끝 날짜
        for point in [self.points.first(), self.points.last()].into_iter().flatten() {
            writeln!(
                svg,
                r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-family="sans-serif" font-size="10">{}</text>"#,
                x(point.date),
                h - MARGIN / 2.0,
                point.date.format(OUTPUT_DATE_FORMAT)
            )?;
        }

        svg.push_str("</svg>\n");
        Ok(())
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
