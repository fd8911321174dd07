//! spendcat-ingest: turn uploaded statements into request material
//! (flattened spreadsheet text and base64 screenshots).

pub mod image;
pub mod parsers;
pub mod types;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use image::{encode_image, read_image_payload};
pub use types::{FileKind, ImagePayload, IngestError, ProcessedFile};

fn spreadsheet_text(path: &Path, name: &str) -> String {
    let is_csv = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    let parsed = if is_csv {
        parsers::delimited::parse_csv_file(path)
    } else {
        parsers::workbook::parse_workbook(path)
    };

    match parsed {
        Ok(text) => text,
        Err(e) => {
            // Still send the file so the model knows it was there
            tracing::warn!(file = %name, error = %format!("{e:#}"), "failed to parse spreadsheet");
            format!("Error parsing content of {name}")
        }
    }
}

/// Convert a batch of files, in input order.
///
/// Unsupported extensions are skipped. A missing file fails the whole batch.
/// Ids are `file-<n>`, counting up from `first_id`.
pub fn process_files(paths: &[PathBuf], first_id: usize) -> Result<Vec<ProcessedFile>> {
    let mut out = Vec::new();

    for path in paths {
        if !path.is_file() {
            return Err(IngestError::NotFound(path.clone()).into());
        }

        let Some((kind, mime_type)) = FileKind::classify(path) else {
            tracing::warn!(path = %path.display(), "skipping unsupported file type");
            continue;
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let parsed_text = match kind {
            FileKind::Spreadsheet => Some(spreadsheet_text(path, &name)),
            FileKind::Image => None,
        };

        out.push(ProcessedFile {
            id: format!("file-{}", first_id + out.len()),
            path: path.clone(),
            name,
            kind,
            mime_type: mime_type.to_string(),
            parsed_text,
        });
    }

    tracing::info!(requested = paths.len(), accepted = out.len(), "processed files");
    Ok(out)
}
