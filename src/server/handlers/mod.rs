//! HTTP request handlers.

mod health;
mod inline_image;
mod ner;
mod ocr;
mod pdf;

pub use health::{ner_health, ocr_health};
pub use inline_image::ocr_base64;
pub use ner::extract_entities;
pub use ocr::{ocr_upload, OcrResponse};
pub use pdf::{pdf_extract, PdfExtractResponse};
