//! CSV exports. Treated as a single sheet named after the file stem.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

use super::{file_header, number, render_sheet};

/// Numeric-looking cells become JSON numbers, like a spreadsheet app would read them.
fn cell(raw: &str) -> Value {
    let s = raw.trim();
    if s.is_empty() {
        return Value::Null;
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() => number(f),
        _ => Value::String(s.to_string()),
    }
}

pub fn parse_csv_text(name: &str, sheet_name: &str, content: &str) -> Result<String> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.with_context(|| format!("reading CSV row in {name}"))?;
        rows.push(record.iter().map(cell).collect());
    }

    let mut text = file_header(name);
    text.push_str(&render_sheet(sheet_name, rows));
    Ok(text)
}

pub fn parse_csv_file(path: &Path) -> Result<String> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let stem = path
        .file_stem()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| name.clone());

    let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    // Bank exports are not always UTF-8; keep what we can
    let content = String::from_utf8_lossy(&bytes);
    parse_csv_text(&name, &stem, &content)
}
