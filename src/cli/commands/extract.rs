//! One-shot text extraction.

use std::path::Path;

use console::style;

use crate::config::Config;
use crate::ocr::DocumentKind;
use crate::server::{OcrResponse, PdfExtractResponse};

/// Extract text from a local file and print the same JSON the OCR service returns.
pub async fn cmd_extract(config: &Config, file: &Path, detailed: bool) -> anyhow::Result<()> {
    if !file.exists() {
        anyhow::bail!("File not found: {}", file.display());
    }

    let extractor = config.text_extractor();
    let path = file.to_path_buf();

    let json = if detailed {
        eprintln!(
            "{} Extracting {} page by page",
            style("→").cyan(),
            file.display()
        );
        let extraction =
            tokio::task::spawn_blocking(move || extractor.extract_pdf_detailed(&path)).await??;
        serde_json::to_string_pretty(&PdfExtractResponse::from(extraction))?
    } else {
        let content = tokio::fs::read(file).await?;
        let kind = DocumentKind::detect(&file.to_string_lossy(), &content);
        eprintln!(
            "{} Extracting {} ({:?})",
            style("→").cyan(),
            file.display(),
            kind
        );
        let result =
            tokio::task::spawn_blocking(move || extractor.extract(&path, kind)).await??;
        serde_json::to_string_pretty(&OcrResponse::from(result))?
    };

    println!("{}", json);
    Ok(())
}
