//! Tesseract OCR backend implementation.
//!
//! Uses Tesseract OCR via command-line for text extraction.

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

use super::backend::{OcrBackend, OcrBackendType, OcrConfig, OcrError, OcrResult, WordConfidences};
use super::pdf;
use super::tools::{check_binary, stdout_of, ToolFailure};

/// Tesseract OCR backend.
pub struct TesseractBackend {
    config: OcrConfig,
}

impl TesseractBackend {
    /// Create a new Tesseract backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: OcrConfig::default(),
        }
    }

    /// Create a new Tesseract backend with custom configuration.
    pub fn with_config(config: OcrConfig) -> Self {
        Self { config }
    }

    /// Run Tesseract on an image file, optionally selecting an output config (e.g. "tsv").
    fn run_tesseract(&self, image_path: &Path, output_config: Option<&str>) -> Result<String, OcrError> {
        let mut cmd = Command::new(&self.config.command);
        cmd.arg(image_path)
            .arg("stdout")
            .args(["-l", &self.config.language]);
        if let Some(psm) = self.config.psm {
            cmd.args(["--psm", &psm.to_string()]);
        }
        if let Some(output_config) = output_config {
            cmd.arg(output_config);
        }

        stdout_of(cmd.output()).map_err(|failure| match failure {
            ToolFailure::NotFound => OcrError::BackendNotAvailable(format!(
                "{} not found (install tesseract-ocr)",
                self.config.command.display()
            )),
            ToolFailure::Failed(stderr) => {
                OcrError::OcrFailed(format!("tesseract failed: {}", stderr))
            }
            ToolFailure::Io(e) => OcrError::Io(e),
        })
    }
}

impl Default for TesseractBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrBackend for TesseractBackend {
    fn backend_type(&self) -> OcrBackendType {
        OcrBackendType::Tesseract
    }

    fn is_available(&self) -> bool {
        check_binary(&self.config.command)
    }

    fn availability_hint(&self) -> String {
        if !check_binary(&self.config.command) {
            "Tesseract not installed. Install with: apt install tesseract-ocr".to_string()
        } else if !check_binary("pdftoppm") {
            "pdftoppm not installed. Install with: apt install poppler-utils".to_string()
        } else {
            "Tesseract is available".to_string()
        }
    }

    fn ocr_image(&self, image_path: &Path) -> Result<OcrResult, OcrError> {
        let text = self.run_tesseract(image_path, None)?;
        Ok(OcrResult {
            text,
            backend: OcrBackendType::Tesseract,
        })
    }

    fn word_confidences(&self, image_path: &Path) -> Result<WordConfidences, OcrError> {
        let tsv = self.run_tesseract(image_path, Some("tsv"))?;
        Ok(parse_tsv_confidences(&tsv))
    }

    fn ocr_pdf_pages(&self, pdf_path: &Path) -> Result<Vec<String>, OcrError> {
        let temp_dir = TempDir::new()?;
        let images = pdf::render_pages(pdf_path, self.config.dpi, temp_dir.path())?;

        if images.is_empty() {
            return Err(OcrError::OcrFailed(
                "No images generated from PDF".to_string(),
            ));
        }

        let mut pages = Vec::with_capacity(images.len());
        for (i, image_path) in images.iter().enumerate() {
            tracing::debug!("OCR page {} of {}", i + 1, images.len());
            pages.push(self.run_tesseract(image_path, None)?);
        }
        Ok(pages)
    }
}

/// Parse the `conf` column of Tesseract TSV output.
///
/// Rows that are not words carry `-1`; only positive scores are kept, truncated
/// to whole numbers.
pub fn parse_tsv_confidences(tsv: &str) -> WordConfidences {
    let mut lines = tsv.lines();
    let conf_idx = lines
        .next()
        .and_then(|header| header.split('\t').position(|col| col.trim() == "conf"))
        .unwrap_or(10);

    let scores = lines
        .filter_map(|line| line.split('\t').nth(conf_idx))
        .filter_map(|conf| conf.trim().parse::<f32>().ok())
        .filter(|&conf| conf > 0.0)
        .map(|conf| conf as u32)
        .collect();

    WordConfidences { scores }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_TSV: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext
1\t1\t0\t0\t0\t0\t0\t0\t400\t200\t-1\t
2\t1\t1\t0\t0\t0\t20\t20\t120\t14\t-1\t
5\t1\t1\t1\t1\t1\t20\t20\t50\t14\t96.563889\tHello
5\t1\t1\t1\t1\t2\t75\t20\t60\t14\t91.000000\tWorld!
5\t1\t1\t1\t2\t1\t20\t40\t10\t14\t0\t.
";

    #[test]
    fn test_parse_tsv_confidences() {
        let conf = parse_tsv_confidences(SAMPLE_TSV);
        assert_eq!(conf.scores, vec![96, 91]);
    }

    #[test]
    fn test_parse_tsv_without_words() {
        let conf = parse_tsv_confidences("level\tconf\ttext\n1\t-1\t\n");
        assert!(conf.scores.is_empty());
        assert_eq!(conf.average(), 0.0);
    }

    #[test]
    fn test_missing_binary_reports_unavailable() {
        let backend = TesseractBackend::with_config(OcrConfig {
            command: "definitely-not-tesseract-4f1c".into(),
            ..OcrConfig::default()
        });
        assert!(!backend.is_available());
        let err = backend.ocr_image(Path::new("missing.png")).unwrap_err();
        assert!(matches!(err, OcrError::BackendNotAvailable(_)));
    }
}
