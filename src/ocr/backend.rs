//! OCR backend abstraction.
//!
//! Tesseract is the only engine wired in today, but handlers and the text
//! extractor talk to it through [`OcrBackend`] so the engine can be swapped
//! or stubbed without touching request handling.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from OCR backends.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Backend not available: {0}")]
    BackendNotAvailable(String),

    #[error("OCR failed: {0}")]
    OcrFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of OCR processing.
#[derive(Debug, Clone)]
pub struct OcrResult {
    /// Extracted text content.
    pub text: String,
    /// Which backend produced this result.
    pub backend: OcrBackendType,
}

/// Per-word confidence values reported by an OCR engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordConfidences {
    /// Confidences on a 0-100 scale. Only words the engine scored above zero.
    pub scores: Vec<u32>,
}

impl WordConfidences {
    /// Mean confidence normalised to 0.0 - 1.0. Zero when no word was scored.
    pub fn average(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        let sum: u64 = self.scores.iter().map(|&s| s as u64).sum();
        let mean = sum as f64 / self.scores.len() as f64;
        (mean / 100.0).clamp(0.0, 1.0)
    }
}

/// Available OCR backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OcrBackendType {
    /// Tesseract OCR via command-line.
    Tesseract,
}

impl OcrBackendType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OcrBackendType::Tesseract => "tesseract",
        }
    }
}

impl std::fmt::Display for OcrBackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trait for OCR backends.
pub trait OcrBackend: Send + Sync {
    /// Get the backend type.
    fn backend_type(&self) -> OcrBackendType;

    /// Check if this backend is available (dependencies installed).
    fn is_available(&self) -> bool;

    /// Get a description of what's needed to make this backend available.
    fn availability_hint(&self) -> String;

    /// Run OCR on an image file.
    fn ocr_image(&self, image_path: &Path) -> Result<OcrResult, OcrError>;

    /// Per-word confidences for an image file.
    fn word_confidences(&self, image_path: &Path) -> Result<WordConfidences, OcrError>;

    /// Render every page of a PDF and OCR each one, returning page texts in order.
    fn ocr_pdf_pages(&self, pdf_path: &Path) -> Result<Vec<String>, OcrError>;
}

/// Configuration for OCR backends.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Tesseract executable (name in PATH or absolute path).
    pub command: PathBuf,
    /// Language for OCR (e.g., "eng", "chi_sim").
    pub language: String,
    /// Tesseract page segmentation mode, if overriding the default.
    pub psm: Option<u8>,
    /// Resolution used when rasterising PDF pages.
    pub dpi: u32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            command: PathBuf::from("tesseract"),
            language: "eng".to_string(),
            psm: None,
            dpi: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_confidence_empty() {
        assert_eq!(WordConfidences::default().average(), 0.0);
    }

    #[test]
    fn test_average_confidence_scaled() {
        let conf = WordConfidences {
            scores: vec![90, 80, 70],
        };
        assert!((conf.average() - 0.8).abs() < 1e-9);
    }
}
