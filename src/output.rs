// 💾 Output - JSON artifacts and CSV export
//
// JSON is written UTF-8 with two-space indentation; serde_json leaves
// non-ASCII characters unescaped, so Thai names land in the file as-is.

use crate::summary::SummaryRow;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
    }
    Ok(())
}

/// Pretty-print any serializable value to `path`
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;

    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to serialize JSON to {:?}", path))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush {:?}", path))?;

    tracing::debug!(path = %path.display(), "Wrote JSON");
    Ok(())
}

/// CSV copy of the summary table, header row first
pub fn write_summary_csv(path: &Path, rows: &[SummaryRow], columns: &[String]) -> Result<()> {
    ensure_parent_dir(path)?;

    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {:?}", path))?;

    wtr.write_record(columns)
        .context("Failed to write CSV header")?;

    for row in rows {
        let record: Vec<String> = columns.iter().map(|c| row.cell(c)).collect();
        wtr.write_record(&record)
            .with_context(|| format!("Failed to write CSV row for {}", row.person))?;
    }

    wtr.flush().context("Failed to flush CSV writer")?;

    tracing::debug!(path = %path.display(), rows = rows.len(), "Wrote CSV");
    Ok(())
}
