use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// .xlsx / .xls / .csv, sent to the model as flattened text
    Spreadsheet,
    /// Statement screenshot, sent inline as base64
    Image,
}

impl FileKind {
    /// Classify a path by extension, returning the kind and its MIME type.
    pub fn classify(path: &Path) -> Option<(FileKind, &'static str)> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        let found = match ext.as_str() {
            "xlsx" => (FileKind::Spreadsheet, "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
            "xls" => (FileKind::Spreadsheet, "application/vnd.ms-excel"),
            "csv" => (FileKind::Spreadsheet, "text/csv"),
            "png" => (FileKind::Image, "image/png"),
            "jpg" | "jpeg" => (FileKind::Image, "image/jpeg"),
            "webp" => (FileKind::Image, "image/webp"),
            "gif" => (FileKind::Image, "image/gif"),
            "heic" => (FileKind::Image, "image/heic"),
            _ => return None,
        };
        Some(found)
    }
}

/// An uploaded file after conversion, ready to be folded into a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedFile {
    pub id: String,
    pub path: PathBuf,
    /// File name without directories, used as the provenance label
    pub name: String,
    pub kind: FileKind,
    pub mime_type: String,
    /// Flattened sheet text (spreadsheets only)
    pub parsed_text: Option<String>,
}

impl ProcessedFile {
    pub fn is_spreadsheet(&self) -> bool {
        self.kind == FileKind::Spreadsheet
    }

    pub fn is_image(&self) -> bool {
        self.kind == FileKind::Image
    }
}

/// Inline image data for a multimodal request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePayload {
    pub mime_type: String,
    /// Standard base64, no data-URL prefix
    pub data: String,
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("not an image: {0}")]
    NotAnImage(PathBuf),

    #[error("failed to read workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },
}
