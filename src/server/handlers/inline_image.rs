//! OCR of a base64-encoded image with word confidences.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

use super::super::{ApiError, OcrState};
use crate::ocr::{decode_base64_image, stage_png};

#[derive(Debug, Deserialize)]
pub struct Base64Request {
    /// Data URL (`data:image/png;base64,...`) or bare base64.
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Base64OcrResponse {
    pub success: bool,
    pub text: String,
    pub lines: Vec<String>,
    pub confidence_scores: Vec<u32>,
    pub average_confidence: f64,
}

/// `POST /ocr-base64`
pub async fn ocr_base64(
    State(state): State<OcrState>,
    payload: Result<Json<Base64Request>, JsonRejection>,
) -> Result<Json<Base64OcrResponse>, ApiError> {
    let Json(request) = payload?;
    let image = request
        .image
        .filter(|image| !image.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("No base64 image provided"))?;

    let extractor = state.extractor.clone();
    let ocr = tokio::task::spawn_blocking(move || -> Result<_, ApiError> {
        let bytes = decode_base64_image(&image)?;
        let staged = stage_png(&bytes)?;
        Ok(extractor.ocr_with_confidence(staged.path())?)
    })
    .await??;

    tracing::info!(
        "OCR'd inline image: {} words, average confidence {:.2}",
        ocr.confidence_scores.len(),
        ocr.average_confidence
    );

    Ok(Json(Base64OcrResponse {
        success: true,
        text: ocr.text,
        lines: ocr.lines,
        confidence_scores: ocr.confidence_scores,
        average_confidence: ocr.average_confidence,
    }))
}
