//! Statement screenshots are passed through untouched as base64.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::types::{ImagePayload, IngestError, ProcessedFile};

pub fn encode_image(bytes: &[u8], mime_type: &str) -> ImagePayload {
    ImagePayload {
        mime_type: mime_type.to_string(),
        data: STANDARD.encode(bytes),
    }
}

/// Read an image file from disk and encode it for an inline request part.
pub fn read_image_payload(file: &ProcessedFile) -> Result<ImagePayload> {
    if !file.is_image() {
        return Err(IngestError::NotAnImage(file.path.clone()).into());
    }
    let bytes = std::fs::read(&file.path).with_context(|| format!("read {}", file.path.display()))?;
    Ok(encode_image(&bytes, &file.mime_type))
}
