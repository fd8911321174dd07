//! Spreadsheet flattening.
//!
//! Every sheet is dumped as a JSON array of row arrays so the model sees the
//! raw grid, headers included:
//!
//!   File: hdfc_sept.xlsx
//!   Sheet: Statement
//!   [["Date","Narration","Debit","Credit"],["01/09/26","Zepto",380,null]]
//!   ---

pub mod delimited;
pub mod workbook;

use serde_json::Value;

pub(crate) fn file_header(name: &str) -> String {
    format!("File: {name}\n")
}

/// Render one sheet block. Trailing empty cells and fully empty rows are dropped.
pub(crate) fn render_sheet(sheet_name: &str, rows: Vec<Vec<Value>>) -> String {
    let rows: Vec<Value> = rows
        .into_iter()
        .filter_map(|mut row| {
            while matches!(row.last(), Some(Value::Null)) {
                row.pop();
            }
            if row.is_empty() { None } else { Some(Value::Array(row)) }
        })
        .collect();

    format!("Sheet: {sheet_name}\n{}\n---\n", Value::Array(rows))
}

pub(crate) fn number(f: f64) -> Value {
    serde_json::Number::from_f64(f)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
