//! Decoding of base64 image payloads.

use std::io::Write;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageFormat;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors decoding an inline image.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image data is empty")]
    EmptyData,

    #[error("Invalid base64 encoding: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Failed to decode image: {0}")]
    DecodeFailed(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Strip a `data:<mime>;base64,` prefix if present.
pub fn strip_data_url(payload: &str) -> &str {
    match payload.split_once(',') {
        Some((head, body)) if head.starts_with("data:") => body,
        _ => payload,
    }
}

/// Decode a base64 image (plain or data URL) into raw bytes.
pub fn decode_base64_image(payload: &str) -> Result<Vec<u8>, ImageError> {
    let encoded: String = strip_data_url(payload.trim())
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if encoded.is_empty() {
        return Err(ImageError::EmptyData);
    }

    let bytes = STANDARD.decode(encoded)?;
    if bytes.is_empty() {
        return Err(ImageError::EmptyData);
    }
    Ok(bytes)
}

/// Decode image bytes and re-encode them as a PNG temp file for the OCR engine.
///
/// Normalising through the `image` crate rejects payloads that are not images
/// before any external tool runs.
pub fn stage_png(bytes: &[u8]) -> Result<NamedTempFile, ImageError> {
    let img = image::load_from_memory(bytes)?;
    tracing::debug!("Decoded image: {}x{}", img.width(), img.height());

    let mut encoded = std::io::Cursor::new(Vec::new());
    img.write_to(&mut encoded, ImageFormat::Png)?;

    let mut file = tempfile::Builder::new()
        .prefix("docextract-")
        .suffix(".png")
        .tempfile()?;
    file.write_all(encoded.get_ref())?;
    file.flush()?;
    Ok(file)
}
