//! Detailed PDF extraction with per-page statistics.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde::Serialize;

use super::super::upload::Upload;
use super::super::{ApiError, OcrState};
use crate::ocr::{PageText, PdfExtraction, PdfType};

#[derive(Debug, Serialize)]
pub struct PdfInfo {
    pub total_pages: u32,
    pub pdf_type: PdfType,
    pub total_characters: usize,
    pub word_count: usize,
    pub processing_method: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PdfExtractResponse {
    pub success: bool,
    pub text: String,
    pub pdf_info: PdfInfo,
    pub pages: Vec<PageText>,
}

impl From<PdfExtraction> for PdfExtractResponse {
    fn from(extraction: PdfExtraction) -> Self {
        Self {
            success: true,
            text: extraction.text,
            pdf_info: PdfInfo {
                total_pages: extraction.total_pages,
                pdf_type: extraction.pdf_type,
                total_characters: extraction.total_characters,
                word_count: extraction.word_count,
                processing_method: extraction.processing_method.label(),
            },
            pages: extraction.pages,
        }
    }
}

/// `POST /pdf-extract`
pub async fn pdf_extract(
    State(state): State<OcrState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PdfExtractResponse>, ApiError> {
    let upload = Upload::receive(multipart)
        .await?
        .ok_or_else(|| ApiError::bad_request("No PDF file provided"))?;

    if !upload.is_pdf() {
        return Err(ApiError::bad_request("Please provide a valid PDF file"));
    }

    let extractor = state.extractor.clone();
    let extraction = tokio::task::spawn_blocking(move || -> Result<_, ApiError> {
        let staged = upload.stage()?;
        Ok(extractor.extract_pdf_detailed(staged.path())?)
    })
    .await??;

    tracing::info!(
        "Extracted {} page(s), classified {}",
        extraction.total_pages,
        extraction.pdf_type.as_str()
    );

    Ok(Json(extraction.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::{assemble_pdf_extraction, OcrError};

    #[test]
    fn test_response_shape() {
        let extraction = assemble_pdf_extraction(
            vec!["Quarterly report for the board of directors".to_string()],
            PdfType::Text,
            || -> Result<Vec<String>, OcrError> { unreachable!() },
        );
        let json = serde_json::to_value(PdfExtractResponse::from(extraction)).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["pdf_info"]["pdf_type"], "text");
        assert_eq!(json["pdf_info"]["processing_method"], "Direct extraction");
        assert_eq!(json["pdf_info"]["total_pages"], 1);
        assert_eq!(json["pages"][0]["page_number"], 1);
        assert_eq!(json["pages"][0]["has_text"], true);
        assert!(json["pages"][0].get("processing_method").is_none());
    }
}
