//! Liveness endpoints.

use axum::Json;
use serde_json::{json, Value};

pub async fn ocr_health() -> Json<Value> {
    Json(json!({
        "status": "OCR API is running!",
        "version": "1.0",
    }))
}

pub async fn ner_health() -> Json<Value> {
    Json(json!({ "status": "NER API is running!" }))
}
