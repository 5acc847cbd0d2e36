//! Configuration management using the prefer crate for discovery.
//!
//! Config files (`docextract.toml`, `.yaml`, `.json`, ...) are discovered by
//! prefer in the standard locations and parsed with serde. Environment
//! variables (optionally from a `.env` file) override file values.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ner::{self, NerBackend, NerError};
use crate::ocr::{
    OcrConfig, PdfReader, TesseractBackend, TextExtractor, DEFAULT_SAMPLE_PAGES,
    DEFAULT_TEXT_THRESHOLD,
};

/// Default port for the OCR service.
pub const DEFAULT_OCR_PORT: u16 = 5000;

/// Default port for the NER service.
pub const DEFAULT_NER_PORT: u16 = 5002;

/// Default upload limit (32 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub ocr: OcrSection,
    pub ner: NerSection,
    /// File this config was loaded from, if any.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

/// Listener settings shared by both services.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub ocr_port: u16,
    pub ner_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            ocr_port: DEFAULT_OCR_PORT,
            ner_port: DEFAULT_NER_PORT,
        }
    }
}

/// OCR and PDF extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSection {
    /// Tesseract executable; `~` is expanded.
    pub command: String,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psm: Option<u8>,
    /// Rasterisation resolution for scanned PDF pages.
    pub dpi: u32,
    /// Leading pages sampled to classify a PDF.
    pub sample_pages: u32,
    /// Sampled characters required to treat a PDF as text-based.
    pub text_threshold: usize,
    pub max_upload_bytes: usize,
}

impl Default for OcrSection {
    fn default() -> Self {
        let defaults = OcrConfig::default();
        Self {
            command: defaults.command.to_string_lossy().into_owned(),
            language: defaults.language,
            psm: defaults.psm,
            dpi: defaults.dpi,
            sample_pages: DEFAULT_SAMPLE_PAGES,
            text_threshold: DEFAULT_TEXT_THRESHOLD,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// NER backend selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NerSection {
    /// `rules` (built in) or `command` (external pipeline).
    pub backend: String,
    /// Program and arguments for the `command` backend.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
}

impl Default for NerSection {
    fn default() -> Self {
        Self {
            backend: "rules".to_string(),
            command: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Falls back to defaults when no config file is found.
    pub async fn load() -> Self {
        let config = match prefer::load("docextract").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("Ignoring config {}: {}", path.display(), e);
                            Self::default()
                        }
                    }
                } else {
                    Self::default()
                }
            }
            Err(_) => Self::default(),
        };
        config.with_env_overrides()
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let mut config = Self::parse(&contents, ext)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse config text in the format named by `ext`.
    pub fn parse(contents: &str, ext: &str) -> Result<Self, String> {
        match ext {
            "toml" => toml::from_str(contents)
                .map_err(|e| format!("Failed to parse TOML config: {}", e)),
            "yaml" | "yml" => serde_yaml::from_str(contents)
                .map_err(|e| format!("Failed to parse YAML config: {}", e)),
            _ => serde_json::from_str(contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e)),
        }
    }

    /// Apply environment variable overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = var("PORT") {
            match port.trim().parse() {
                Ok(port) => self.server.ocr_port = port,
                Err(_) => tracing::warn!("Ignoring invalid PORT: {}", port),
            }
        }
        if let Some(port) = var("NER_PORT") {
            match port.trim().parse() {
                Ok(port) => self.server.ner_port = port,
                Err(_) => tracing::warn!("Ignoring invalid NER_PORT: {}", port),
            }
        }
        if let Some(cmd) = var("TESSERACT_CMD") {
            self.ocr.command = cmd;
        }
        if let Some(lang) = var("OCR_LANGUAGE") {
            self.ocr.language = lang;
        }
        if let Some(backend) = var("NER_BACKEND") {
            self.ner.backend = backend;
        }
        self
    }

    /// Tesseract settings for the OCR backend.
    pub fn ocr_config(&self) -> OcrConfig {
        OcrConfig {
            command: PathBuf::from(shellexpand::tilde(&self.ocr.command).as_ref()),
            language: self.ocr.language.clone(),
            psm: self.ocr.psm,
            dpi: self.ocr.dpi,
        }
    }

    pub fn pdf_reader(&self) -> PdfReader {
        PdfReader::new()
            .with_sample_pages(self.ocr.sample_pages)
            .with_text_threshold(self.ocr.text_threshold)
    }

    pub fn text_extractor(&self) -> TextExtractor {
        TextExtractor::new(
            Arc::new(TesseractBackend::with_config(self.ocr_config())),
            self.pdf_reader(),
        )
    }

    pub fn ner_backend(&self) -> Result<Arc<dyn NerBackend>, NerError> {
        ner::build_backend(&self.ner.backend, &self.ner.command)
    }
}
