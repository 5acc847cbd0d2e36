//! Router configuration for the OCR and NER services.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::{NerState, OcrState};

/// Create the OCR service router.
pub fn ocr_router(state: OcrState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::ocr_health))
        .route("/ocr", post(handlers::ocr_upload))
        .route("/pdf-extract", post(handlers::pdf_extract))
        .route("/ocr-base64", post(handlers::ocr_base64))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Create the NER service router.
pub fn ner_router(state: NerState) -> Router {
    Router::new()
        .route("/", get(handlers::ner_health))
        .route("/extract", post(handlers::extract_entities))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
