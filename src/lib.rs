//! docextract - text and entity extraction services.
//!
//! An OCR service that reads text from images and PDFs (Tesseract and the
//! Poppler tools), and an NER service that tags entities in text.

pub mod cli;
pub mod config;
pub mod ner;
pub mod ocr;
pub mod server;
