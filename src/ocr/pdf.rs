//! PDF text layer access through Poppler's command-line tools.
//!
//! `pdfinfo` for page counts, `pdftotext` for the text layer and `pdftoppm`
//! for rasterising pages ahead of OCR.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;
use thiserror::Error;

use super::backend::OcrError;
use super::tools::{status_of, stdout_of, ToolFailure};

/// Pages sampled when deciding whether a PDF carries a text layer.
pub const DEFAULT_SAMPLE_PAGES: u32 = 3;

/// Sampled characters needed before a PDF counts as text-based.
pub const DEFAULT_TEXT_THRESHOLD: usize = 50;

/// Errors reading a PDF.
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("PDF read failed: {0}")]
    ReadFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PdfError {
    fn from_failure(failure: ToolFailure, tool: &str, context: &str) -> Self {
        match failure {
            ToolFailure::NotFound => {
                PdfError::ToolNotFound(format!("{} (install poppler-utils)", tool))
            }
            ToolFailure::Failed(stderr) => {
                PdfError::ReadFailed(format!("{}: {}", context, stderr))
            }
            ToolFailure::Io(e) => PdfError::Io(e),
        }
    }
}

/// Whether a PDF stores extractable text or only page images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PdfType {
    Text,
    Scanned,
}

impl PdfType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PdfType::Text => "text",
            PdfType::Scanned => "scanned",
        }
    }
}

/// Classify a PDF from the text of its first pages.
pub fn classify_sample<S: AsRef<str>>(sample: &[S], threshold: usize) -> PdfType {
    let total: usize = sample
        .iter()
        .map(|text| text.as_ref().trim().chars().count())
        .sum();
    if total > threshold {
        PdfType::Text
    } else {
        PdfType::Scanned
    }
}

/// Reader for PDF text layers.
#[derive(Debug, Clone)]
pub struct PdfReader {
    sample_pages: u32,
    text_threshold: usize,
}

impl Default for PdfReader {
    fn default() -> Self {
        Self {
            sample_pages: DEFAULT_SAMPLE_PAGES,
            text_threshold: DEFAULT_TEXT_THRESHOLD,
        }
    }
}

impl PdfReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how many leading pages are sampled for classification.
    pub fn with_sample_pages(mut self, pages: u32) -> Self {
        self.sample_pages = pages;
        self
    }

    /// Set the character threshold separating text PDFs from scans.
    pub fn with_text_threshold(mut self, threshold: usize) -> Self {
        self.text_threshold = threshold;
        self
    }

    /// Get the page count of a PDF.
    pub fn page_count(&self, file_path: &Path) -> Result<u32, PdfError> {
        let stdout = stdout_of(Command::new("pdfinfo").arg(file_path).output())
            .map_err(|f| PdfError::from_failure(f, "pdfinfo", "pdfinfo failed"))?;

        parse_page_count(&stdout)
            .ok_or_else(|| PdfError::ReadFailed("pdfinfo reported no page count".to_string()))
    }

    /// Run pdftotext on a single page (1-based).
    pub fn page_text(&self, file_path: &Path, page: u32) -> Result<String, PdfError> {
        let output = Command::new("pdftotext")
            .args(pdftotext_args(Some(page)))
            .arg(file_path)
            .arg("-")
            .output();

        stdout_of(output)
            .map(|text| strip_page_breaks(&text))
            .map_err(|f| {
                PdfError::from_failure(f, "pdftotext", &format!("pdftotext failed on page {}", page))
            })
    }

    /// Text layer of every page, in order.
    pub fn all_page_texts(&self, file_path: &Path) -> Result<Vec<String>, PdfError> {
        let count = self.page_count(file_path)?;
        (1..=count)
            .map(|page| self.page_text(file_path, page))
            .collect()
    }

    /// Text layer of the whole document.
    pub fn document_text(&self, file_path: &Path) -> Result<String, PdfError> {
        let output = Command::new("pdftotext")
            .args(pdftotext_args(None))
            .arg(file_path)
            .arg("-")
            .output();

        stdout_of(output)
            .map(|text| strip_page_breaks(&text))
            .map_err(|f| PdfError::from_failure(f, "pdftotext", "pdftotext failed"))
    }

    /// Decide whether the PDF has a usable text layer. Unreadable PDFs count as scanned.
    pub fn classify(&self, file_path: &Path) -> PdfType {
        let sample = self.page_count(file_path).and_then(|count| {
            (1..=count.min(self.sample_pages))
                .map(|page| self.page_text(file_path, page))
                .collect::<Result<Vec<_>, _>>()
        });

        match sample {
            Ok(texts) => classify_sample(&texts, self.text_threshold),
            Err(e) => {
                tracing::debug!("PDF classification failed, assuming scanned: {}", e);
                PdfType::Scanned
            }
        }
    }
}

/// pdftotext arguments for plain reading order, without `-layout` padding.
fn pdftotext_args(page: Option<u32>) -> Vec<String> {
    let mut args = vec!["-enc".to_string(), "UTF-8".to_string()];
    if let Some(page) = page {
        args.extend(["-f".to_string(), page.to_string(), "-l".to_string(), page.to_string()]);
    }
    args
}

/// pdftotext ends every page with a form feed; pages are joined by newlines instead.
fn strip_page_breaks(text: &str) -> String {
    text.trim_end_matches('\x0c').replace('\x0c', "\n")
}

fn parse_page_count(pdfinfo: &str) -> Option<u32> {
    pdfinfo
        .lines()
        .find(|line| line.starts_with("Pages:"))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse().ok())
}

/// Rasterise every page of a PDF into PNGs under `output_dir`, sorted by page.
pub fn render_pages(pdf_path: &Path, dpi: u32, output_dir: &Path) -> Result<Vec<PathBuf>, OcrError> {
    let status = Command::new("pdftoppm")
        .args(["-png", "-r", &dpi.to_string()])
        .arg(pdf_path)
        .arg(output_dir.join("page"))
        .status();

    status_of(status).map_err(|failure| match failure {
        ToolFailure::NotFound => OcrError::BackendNotAvailable(
            "pdftoppm not found (install poppler-utils)".to_string(),
        ),
        ToolFailure::Failed(msg) => {
            OcrError::OcrFailed(format!("pdftoppm failed to convert PDF: {}", msg))
        }
        ToolFailure::Io(e) => OcrError::Io(e),
    })?;

    // pdftoppm zero-pads page numbers to a common width, so names sort by page.
    let mut images: Vec<PathBuf> = std::fs::read_dir(output_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map(|ext| ext == "png").unwrap_or(false))
        .collect();
    images.sort();

    Ok(images)
}
