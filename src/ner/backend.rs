//! NER backend abstraction and shared entity types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from NER backends.
#[derive(Debug, Error)]
pub enum NerError {
    #[error("Backend not available: {0}")]
    BackendNotAvailable(String),

    #[error("Unknown NER backend: {0}")]
    UnknownBackend(String),

    #[error("Entity extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Invalid pipeline output: {0}")]
    InvalidOutput(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A recognised entity span.
///
/// Labels follow the OntoNotes scheme used by common NLP pipelines
/// (`PERSON`, `ORG`, `GPE`, `LOC`, `DATE`, `MONEY`, `PERCENT`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: String,
    /// Byte offset of the span start in the source text, when known.
    #[serde(skip)]
    pub start: Option<usize>,
}

impl Entity {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
            start: None,
        }
    }
}

/// Trait for pluggable NER backends.
///
/// `RuleNerBackend` works out of the box with no model files.
/// `CommandNerBackend` hands text to an external pretrained pipeline.
pub trait NerBackend: Send + Sync {
    /// Human-readable backend identifier (e.g. "rules", "command").
    fn backend_id(&self) -> &str;

    /// Whether the backend can run right now.
    fn is_available(&self) -> bool;

    /// Extract named entities from text, in text order.
    fn extract(&self, text: &str) -> Result<Vec<Entity>, NerError>;
}
