//! Text extraction from uploaded documents using pdftotext and Tesseract.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use super::backend::{OcrBackend, OcrError};
use super::pdf::{PdfError, PdfReader, PdfType};
use super::tesseract::TesseractBackend;
use super::tools::check_binary;

/// A page needs more than this many characters to count as having text.
pub const PAGE_TEXT_MIN_CHARS: usize = 10;

/// Errors that can occur during text extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error(transparent)]
    Ocr(#[from] OcrError),

    #[error(transparent)]
    Pdf(#[from] PdfError),
}

impl ExtractionError {
    /// Whether the failure comes from a missing external tool.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            ExtractionError::Ocr(OcrError::BackendNotAvailable(_))
                | ExtractionError::Pdf(PdfError::ToolNotFound(_))
        )
    }
}

/// What kind of document an upload is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Image,
    Pdf,
}

impl DocumentKind {
    /// Decide from the client filename, falling back to sniffing the content.
    /// Anything that is not a PDF is handed to OCR as an image.
    pub fn detect(filename: &str, content: &[u8]) -> Self {
        let by_name = mime_guess::from_path(filename).first_raw();
        let by_content = infer::get(content).map(|t| t.mime_type());

        if by_name == Some("application/pdf") || by_content == Some("application/pdf") {
            DocumentKind::Pdf
        } else {
            DocumentKind::Image
        }
    }
}

/// Method used to extract text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    /// Direct text extraction from the PDF text layer.
    PdfToText,
    /// OCR using Tesseract.
    TesseractOcr,
}

impl ExtractionMethod {
    pub fn label(&self) -> &'static str {
        match self {
            ExtractionMethod::PdfToText => "Direct extraction",
            ExtractionMethod::TesseractOcr => "OCR",
        }
    }
}

/// Result of plain text extraction.
#[derive(Debug)]
pub struct ExtractionResult {
    /// Extracted text content.
    pub text: String,
    /// Non-empty trimmed lines of `text`.
    pub lines: Vec<String>,
    /// Method used for extraction.
    pub method: ExtractionMethod,
}

/// Text-layer summary of one PDF page.
#[derive(Debug, Clone, Serialize)]
pub struct PageText {
    pub page_number: u32,
    pub text: String,
    pub char_count: usize,
    pub has_text: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_method: Option<&'static str>,
}

/// Detailed PDF extraction with classification and per-page breakdown.
#[derive(Debug, Clone)]
pub struct PdfExtraction {
    pub text: String,
    pub total_pages: u32,
    pub pdf_type: PdfType,
    pub total_characters: usize,
    pub word_count: usize,
    pub processing_method: ExtractionMethod,
    pub pages: Vec<PageText>,
}

/// OCR output with per-word confidences.
#[derive(Debug, Clone)]
pub struct ConfidentOcr {
    pub text: String,
    pub lines: Vec<String>,
    pub confidence_scores: Vec<u32>,
    /// Mean word confidence, 0.0 - 1.0.
    pub average_confidence: f64,
}

/// Text extractor that uses external tools.
pub struct TextExtractor {
    ocr: Arc<dyn OcrBackend>,
    pdf: PdfReader,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new(Arc::new(TesseractBackend::new()), PdfReader::new())
    }
}

impl TextExtractor {
    pub fn new(ocr: Arc<dyn OcrBackend>, pdf: PdfReader) -> Self {
        Self { ocr, pdf }
    }

    pub fn ocr_backend(&self) -> &dyn OcrBackend {
        self.ocr.as_ref()
    }

    /// Extract text from a file. PDFs use their text layer, falling back to
    /// OCR of every page when the layer is empty.
    pub fn extract(
        &self,
        file_path: &Path,
        kind: DocumentKind,
    ) -> Result<ExtractionResult, ExtractionError> {
        let (text, method) = match kind {
            DocumentKind::Image => {
                let result = self.ocr.ocr_image(file_path)?;
                tracing::debug!("OCR'd image with {}", result.backend);
                (result.text.trim().to_string(), ExtractionMethod::TesseractOcr)
            }
            DocumentKind::Pdf => {
                let text = self.pdf.document_text(file_path)?;
                if text.trim().is_empty() {
                    tracing::debug!("Empty text layer, falling back to OCR");
                    let pages = self.ocr.ocr_pdf_pages(file_path)?;
                    tracing::debug!("OCR'd {} page(s)", pages.len());
                    (join_ocr_pages(&pages), ExtractionMethod::TesseractOcr)
                } else {
                    (text, ExtractionMethod::PdfToText)
                }
            }
        };

        Ok(ExtractionResult {
            lines: split_lines(&text),
            text,
            method,
        })
    }

    /// Classify a PDF, read every page's text layer and OCR it when scanned.
    pub fn extract_pdf_detailed(&self, file_path: &Path) -> Result<PdfExtraction, ExtractionError> {
        let pdf_type = self.pdf.classify(file_path);
        let page_texts = self.pdf.all_page_texts(file_path)?;

        Ok(assemble_pdf_extraction(page_texts, pdf_type, || {
            self.ocr.ocr_pdf_pages(file_path)
        }))
    }

    /// OCR an image and report per-word confidences.
    pub fn ocr_with_confidence(&self, file_path: &Path) -> Result<ConfidentOcr, ExtractionError> {
        let confidences = self.ocr.word_confidences(file_path)?;
        let text = self.ocr.ocr_image(file_path)?.text.trim().to_string();

        Ok(ConfidentOcr {
            lines: split_lines(&text),
            text,
            average_confidence: confidences.average(),
            confidence_scores: confidences.scores,
        })
    }

    /// Check if required tools are available.
    pub fn check_tools() -> Vec<(String, bool)> {
        ["pdftotext", "pdftoppm", "pdfinfo", "tesseract"]
            .iter()
            .map(|tool| (tool.to_string(), check_binary(tool)))
            .collect()
    }
}

/// Build the detailed extraction from per-page text layers.
///
/// `ocr_fallback` runs only when the document is scanned or has no text at
/// all; if it fails the text-layer result is kept.
pub fn assemble_pdf_extraction<F>(
    page_texts: Vec<String>,
    pdf_type: PdfType,
    ocr_fallback: F,
) -> PdfExtraction
where
    F: FnOnce() -> Result<Vec<String>, OcrError>,
{
    let mut full_text = String::new();
    let mut pages = Vec::with_capacity(page_texts.len());

    for (i, raw) in page_texts.iter().enumerate() {
        let page_number = i as u32 + 1;
        let trimmed = raw.trim();
        let char_count = trimmed.chars().count();

        pages.push(PageText {
            page_number,
            text: trimmed.to_string(),
            char_count,
            has_text: char_count > PAGE_TEXT_MIN_CHARS,
            processing_method: None,
        });
        full_text.push_str(&format!("\n--- Page {} ---\n{}\n", page_number, raw));
    }

    if pdf_type == PdfType::Scanned || full_text.trim().is_empty() {
        match ocr_fallback() {
            Ok(ocr_pages) => {
                let ocr_text = join_ocr_pages(&ocr_pages);
                if !ocr_text.is_empty() {
                    full_text = ocr_text;
                    for page in pages.iter_mut().filter(|p| !p.has_text) {
                        page.processing_method = Some(ExtractionMethod::TesseractOcr.label());
                    }
                }
            }
            Err(e) => tracing::warn!("OCR fallback failed, keeping text layer: {}", e),
        }
    }

    let processing_method = match pdf_type {
        PdfType::Text => ExtractionMethod::PdfToText,
        PdfType::Scanned => ExtractionMethod::TesseractOcr,
    };

    PdfExtraction {
        total_pages: page_texts.len() as u32,
        pdf_type,
        total_characters: full_text.chars().count(),
        word_count: full_text.split_whitespace().count(),
        text: full_text.trim().to_string(),
        processing_method,
        pages,
    }
}

/// Join OCR'd page texts, skipping blank pages, with page markers.
pub fn join_ocr_pages<S: AsRef<str>>(pages: &[S]) -> String {
    let mut text = String::new();
    for (i, page) in pages.iter().enumerate() {
        let page = page.as_ref().trim();
        if !page.is_empty() {
            text.push_str(&format!("\n--- Page {} ---\n{}\n", i + 1, page));
        }
    }
    text
}

/// Split text into trimmed, non-empty lines.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_tools() {
        let tools = TextExtractor::check_tools();
        assert_eq!(tools.len(), 4);
        for (tool, available) in tools {
            println!("{}: {}", tool, if available { "found" } else { "missing" });
        }
    }

    #[test]
    fn test_split_lines() {
        let lines = split_lines("  Hello World!\n\n\tThis is a test  \r\n   \nend");
        assert_eq!(lines, vec!["Hello World!", "This is a test", "end"]);
    }

    #[test]
    fn test_join_ocr_pages_skips_blank() {
        let text = join_ocr_pages(&["first page\n", "  \n", "third"]);
        assert_eq!(
            text,
            "\n--- Page 1 ---\nfirst page\n\n--- Page 3 ---\nthird\n"
        );
        assert!(join_ocr_pages::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_detect_kind() {
        assert_eq!(DocumentKind::detect("Report.PDF", b""), DocumentKind::Pdf);
        assert_eq!(DocumentKind::detect("upload", b"%PDF-1.7\n"), DocumentKind::Pdf);
        assert_eq!(
            DocumentKind::detect("scan.png", b"\x89PNG\r\n\x1a\n"),
            DocumentKind::Image
        );
        assert_eq!(DocumentKind::detect("photo.jpg", b""), DocumentKind::Image);
    }

    #[test]
    fn test_assemble_text_pdf_skips_ocr() {
        let pages = vec![
            "Annual report for the fiscal year\n".to_string(),
            "Revenue grew in every region.\n".to_string(),
        ];
        let result = assemble_pdf_extraction(pages, PdfType::Text, || {
            panic!("OCR must not run for text PDFs")
        });

        assert_eq!(result.total_pages, 2);
        assert_eq!(result.pdf_type, PdfType::Text);
        assert_eq!(result.processing_method.label(), "Direct extraction");
        assert!(result.text.starts_with("--- Page 1 ---\nAnnual report"));
        assert!(result.text.contains("--- Page 2 ---\nRevenue grew"));
        assert_eq!(result.pages[0].char_count, "Annual report for the fiscal year".len());
        assert!(result.pages.iter().all(|p| p.has_text));
        assert!(result.pages.iter().all(|p| p.processing_method.is_none()));
        assert_eq!(
            result.word_count,
            result.text.split_whitespace().count()
        );
    }

    #[test]
    fn test_assemble_scanned_pdf_uses_ocr() {
        let pages = vec!["\x0c".to_string(), "  ".to_string()];
        let result = assemble_pdf_extraction(pages, PdfType::Scanned, || {
            Ok(vec!["Scanned page one".to_string(), "Scanned page two".to_string()])
        });

        assert_eq!(result.processing_method.label(), "OCR");
        assert_eq!(
            result.text,
            "--- Page 1 ---\nScanned page one\n\n--- Page 2 ---\nScanned page two"
        );
        assert!(result.pages.iter().all(|p| !p.has_text));
        assert!(result
            .pages
            .iter()
            .all(|p| p.processing_method == Some("OCR")));
        assert_eq!(
            result.total_characters,
            "\n--- Page 1 ---\nScanned page one\n\n--- Page 2 ---\nScanned page two\n"
                .chars()
                .count()
        );
    }

    #[test]
    fn test_assemble_keeps_text_layer_when_ocr_fails() {
        let pages = vec!["tiny".to_string()];
        let result = assemble_pdf_extraction(pages, PdfType::Scanned, || {
            Err(OcrError::BackendNotAvailable("no tesseract".to_string()))
        });

        assert_eq!(result.text, "--- Page 1 ---\ntiny");
        assert_eq!(result.pages[0].char_count, 4);
        assert!(!result.pages[0].has_text);
        assert!(result.pages[0].processing_method.is_none());
    }

    #[test]
    fn test_page_text_threshold() {
        let pages = vec!["0123456789".to_string(), "0123456789a".to_string()];
        let result = assemble_pdf_extraction(pages, PdfType::Text, || Ok(vec![]));
        assert!(!result.pages[0].has_text);
        assert!(result.pages[1].has_text);
    }
}
