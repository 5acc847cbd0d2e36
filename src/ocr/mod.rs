//! OCR and text extraction module.
//!
//! Extracts text from uploaded documents using:
//! - pdftotext / pdfinfo (Poppler) for PDF text layers
//! - pdftoppm (Poppler) to rasterise scanned PDF pages
//! - Tesseract OCR for images and rasterised pages
//!
//! PDFs are classified as text-based or scanned by sampling the text layer of
//! their first pages; scanned documents fall back to per-page OCR.

mod backend;
mod extractor;
mod inline_image;
mod pdf;
mod tesseract;
mod tools;

pub use backend::{OcrBackend, OcrBackendType, OcrConfig, OcrError, OcrResult, WordConfidences};
pub use extractor::{
    assemble_pdf_extraction, join_ocr_pages, split_lines, ConfidentOcr, DocumentKind,
    ExtractionError, ExtractionMethod, ExtractionResult, PageText, PdfExtraction, TextExtractor,
    PAGE_TEXT_MIN_CHARS,
};
pub use inline_image::{decode_base64_image, stage_png, strip_data_url, ImageError};
pub use pdf::{
    classify_sample, PdfError, PdfReader, PdfType, DEFAULT_SAMPLE_PAGES, DEFAULT_TEXT_THRESHOLD,
};
pub use tesseract::{parse_tsv_confidences, TesseractBackend};
pub use tools::check_binary;
