//! 결과 테이블 출력 (표준 출력 / CSV 파일).

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use finscrape_core::ResultTable;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

/// 요청 중 표시할 스피너
pub fn spinner(message: impl Into<String>) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .context("Invalid spinner template")?,
    );
    pb.set_message(message.into());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(pb)
}

/// 테이블을 CSV로 씁니다 (헤더 포함).
pub fn write_csv<W: Write>(table: &ResultTable, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(table.headers())?;

    for index in 0..table.row_count() {
        if let Some(row) = table.row(index) {
            wtr.write_record(row.iter().map(|cell| cell.to_string()))?;
        }
    }

    wtr.flush()?;
    Ok(())
}

/// 테이블을 CSV 파일로 저장합니다. 상위 디렉토리는 자동 생성됩니다.
pub fn save_csv(table: &ResultTable, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    write_csv(table, io::BufWriter::new(file))?;

    info!("Saved {} rows to {}", table.row_count(), path.display());
    Ok(())
}

/// 테이블을 열 맞춤 텍스트로 씁니다.
pub fn write_aligned<W: Write>(table: &ResultTable, mut writer: W) -> Result<()> {
    let rows: Vec<Vec<String>> = (0..table.row_count())
        .filter_map(|i| table.row(i))
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect();

    let headers = table.headers();
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            rows.iter()
                .map(|row| row[col].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    writeln!(writer, "{}", aligned_line(headers.iter().copied(), &widths))?;
    for row in &rows {
        writeln!(writer, "{}", aligned_line(row.iter().map(String::as_str), &widths))?;
    }

    Ok(())
}

fn aligned_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    line.join("  ").trim_end().to_string()
}

/// 출력 경로가 있으면 CSV로 저장하고, 없으면 표준 출력에 표로 출력합니다.
pub fn emit(table: &ResultTable, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            save_csv(table, path)?;
            println!("저장 위치: {}", path.display());
        }
        None => write_aligned(table, io::stdout().lock())?,
    }

    if table.coercion_failures() > 0 {
        eprintln!(
            "경고: 숫자로 변환하지 못한 셀 {}개를 0으로 대체했습니다",
            table.coercion_failures()
        );
    }

    Ok(())
}
