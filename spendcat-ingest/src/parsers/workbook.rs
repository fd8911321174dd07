//! Excel workbooks (.xlsx / .xls), every sheet in workbook order.

use anyhow::Result;
use calamine::{open_workbook_auto, Data, Reader};
use serde_json::Value;
use std::path::Path;

use super::{file_header, number, render_sheet};
use crate::types::IngestError;

fn cell(data: &Data) -> Value {
    match data {
        Data::Empty => Value::Null,
        Data::Int(i) => Value::from(*i),
        Data::Float(f) => number(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) => {
            if s.trim().is_empty() {
                Value::Null
            } else {
                Value::String(s.clone())
            }
        }
        // Raw serial, same as an unformatted sheet export
        Data::DateTime(dt) => number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
        Data::Error(e) => Value::String(format!("#{e:?}")),
    }
}

pub fn parse_workbook(path: &Path) -> Result<String> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut workbook = open_workbook_auto(path).map_err(|e| IngestError::Workbook {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut text = file_header(&name);
    for sheet_name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| IngestError::Workbook {
                path: path.to_path_buf(),
                message: format!("sheet {sheet_name}: {e}"),
            })?;

        let rows = range
            .rows()
            .map(|row| row.iter().map(cell).collect())
            .collect();
        text.push_str(&render_sheet(&sheet_name, rows));
    }

    tracing::debug!(file = %name, bytes = text.len(), "flattened workbook");
    Ok(text)
}
