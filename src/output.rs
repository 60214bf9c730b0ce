use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::parser::Queue;
use crate::records::Record;

/// Lets spreadsheet tools pick up UTF-8 (Korean names, `#` tags).
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Serialize)]
struct CsvRow<'a> {
    date: String,
    name: &'a str,
    tier: &'a str,
    lp: i64,
    score: String,
}

/// `<out_dir>/<input stem>.<queue>.csv`
pub fn output_path(out_dir: &Path, input: &Path, queue: Queue) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    out_dir.join(format!("{}.{}.csv", stem, queue))
}

/// Two decimals with trailing zeros trimmed: `6.40` -> `6.4`, `8.00` -> `8`.
pub fn format_score(score: f64) -> String {
    let fixed = format!("{:.2}", score);
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub fn write_csv(records: &[Record], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let mut file = BufWriter::new(
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
    );
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(file);
    for r in records {
        writer.serialize(CsvRow {
            date: r.day.format("%Y-%m-%d").to_string(),
            name: &r.subject,
            tier: &r.tier,
            lp: r.lp,
            score: format_score(r.score),
        })?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
