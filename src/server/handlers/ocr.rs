//! Plain OCR of an uploaded image or PDF.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde::Serialize;

use super::super::upload::receive_upload;
use super::super::{ApiError, OcrState};
use crate::ocr::ExtractionResult;

#[derive(Debug, Serialize)]
pub struct OcrResponse {
    pub success: bool,
    pub text: String,
    pub lines: Vec<String>,
}

impl From<ExtractionResult> for OcrResponse {
    fn from(result: ExtractionResult) -> Self {
        Self {
            success: true,
            text: result.text,
            lines: result.lines,
        }
    }
}

/// `POST /ocr`: images are OCR'd, PDFs use their text layer or OCR per page.
pub async fn ocr_upload(
    State(state): State<OcrState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<OcrResponse>, ApiError> {
    let upload = receive_upload(multipart).await?;
    let kind = upload.kind();
    tracing::debug!(
        "OCR request for '{}' ({} bytes, {:?})",
        upload.filename,
        upload.bytes.len(),
        kind
    );

    let extractor = state.extractor.clone();
    let result = tokio::task::spawn_blocking(move || -> Result<_, ApiError> {
        let staged = upload.stage()?;
        Ok(extractor.extract(staged.path(), kind)?)
    })
    .await??;

    tracing::info!(
        "Extracted {} lines via {}",
        result.lines.len(),
        result.method.label()
    );

    Ok(Json(result.into()))
}
