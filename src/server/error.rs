//! Error responses for the HTTP services.

use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ner::NerError;
use crate::ocr::{ExtractionError, ImageError};

/// Handler error rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid input (400).
    #[error("{0}")]
    BadRequest(String),

    /// Upload exceeds the configured body limit (413).
    #[error("{0}")]
    PayloadTooLarge(String),

    /// A required engine or tool is missing (503).
    #[error("{0}")]
    Unavailable(String),

    /// Anything else (500).
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::BadRequest(msg) | ApiError::PayloadTooLarge(msg) => {
                tracing::debug!("Rejected request: {}", msg)
            }
            ApiError::Unavailable(msg) => tracing::warn!("Engine unavailable: {}", msg),
            ApiError::Internal(msg) => tracing::error!("Request failed: {}", msg),
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<ExtractionError> for ApiError {
    fn from(e: ExtractionError) -> Self {
        if e.is_unavailable() {
            ApiError::Unavailable(e.to_string())
        } else {
            ApiError::Internal(e.to_string())
        }
    }
}

impl From<ImageError> for ApiError {
    fn from(e: ImageError) -> Self {
        match e {
            ImageError::Io(_) => ApiError::Internal(e.to_string()),
            _ => ApiError::BadRequest(e.to_string()),
        }
    }
}

impl From<NerError> for ApiError {
    fn from(e: NerError) -> Self {
        match e {
            NerError::BackendNotAvailable(_) => ApiError::Unavailable(e.to_string()),
            _ => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(rejection.body_text())
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(e.body_text())
        } else {
            ApiError::BadRequest(e.body_text())
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::Internal(format!("IO error: {}", e))
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("Worker task failed: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::{OcrError, PdfError};

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::bad_request("No file provided").status(),
            StatusCode::BAD_REQUEST
        );

        let missing: ApiError =
            ExtractionError::Ocr(OcrError::BackendNotAvailable("tesseract".into())).into();
        assert_eq!(missing.status(), StatusCode::SERVICE_UNAVAILABLE);

        let missing_pdf: ApiError =
            ExtractionError::Pdf(PdfError::ToolNotFound("pdftotext".into())).into();
        assert_eq!(missing_pdf.status(), StatusCode::SERVICE_UNAVAILABLE);

        let failed: ApiError = ExtractionError::Ocr(OcrError::OcrFailed("boom".into())).into();
        assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_image_errors_are_client_errors() {
        let err: ApiError = ImageError::EmptyData.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_ner_errors() {
        let err: ApiError = NerError::BackendNotAvailable("python3 not found".into()).into();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);

        let err: ApiError = NerError::ExtractionFailed("exit 1".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
