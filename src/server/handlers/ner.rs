//! Entity extraction endpoint.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

use super::super::{ApiError, NerState};
use crate::ner::Entity;

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub entities: Vec<Entity>,
}

/// `POST /extract`: a missing `text` is treated as empty.
pub async fn extract_entities(
    State(state): State<NerState>,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<Json<ExtractResponse>, ApiError> {
    let Json(request) = payload?;
    let text = request.text.unwrap_or_default();

    let backend = state.backend.clone();
    let entities = tokio::task::spawn_blocking(move || backend.extract(&text)).await??;

    tracing::debug!(
        "{} entities via {}",
        entities.len(),
        state.backend.backend_id()
    );

    Ok(Json(ExtractResponse { entities }))
}
