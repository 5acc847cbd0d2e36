//! HTTP services for text and entity extraction.
//!
//! Two independent routers:
//! - OCR service: image/PDF upload, detailed PDF extraction, base64 images
//! - NER service: entity extraction from JSON text
//!
//! Handlers are stateless; engine calls run on the blocking pool.

mod error;
mod handlers;
mod routes;
mod upload;

pub use error::ApiError;
pub use handlers::{OcrResponse, PdfExtractResponse};
pub use routes::{ner_router, ocr_router};
pub use upload::Upload;

use std::sync::Arc;

use axum::Router;

use crate::config::Config;
use crate::ner::{NerBackend, NerError};
use crate::ocr::TextExtractor;

/// Shared state for the OCR service.
#[derive(Clone)]
pub struct OcrState {
    pub extractor: Arc<TextExtractor>,
    pub max_upload_bytes: usize,
}

impl OcrState {
    pub fn new(extractor: TextExtractor, max_upload_bytes: usize) -> Self {
        Self {
            extractor: Arc::new(extractor),
            max_upload_bytes,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.text_extractor(), config.ocr.max_upload_bytes)
    }
}

/// Shared state for the NER service.
#[derive(Clone)]
pub struct NerState {
    pub backend: Arc<dyn NerBackend>,
}

impl NerState {
    pub fn new(backend: Arc<dyn NerBackend>) -> Self {
        Self { backend }
    }

    pub fn from_config(config: &Config) -> Result<Self, NerError> {
        Ok(Self::new(config.ner_backend()?))
    }
}

/// Start the OCR service.
pub async fn serve_ocr(config: &Config, host: &str, port: u16) -> anyhow::Result<()> {
    for (tool, available) in TextExtractor::check_tools() {
        if !available {
            tracing::warn!("{} not found; requests needing it will fail with 503", tool);
        }
    }

    let state = OcrState::from_config(config);
    serve(ocr_router(state), "OCR", host, port).await
}

/// Start the NER service.
pub async fn serve_ner(config: &Config, host: &str, port: u16) -> anyhow::Result<()> {
    let state = NerState::from_config(config)?;
    if !state.backend.is_available() {
        tracing::warn!(
            "NER backend '{}' is not available; /extract will fail with 503",
            state.backend.backend_id()
        );
    }
    serve(ner_router(state), "NER", host, port).await
}

async fn serve(app: Router, name: &str, host: &str, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("Starting {} server at http://{}", name, listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
