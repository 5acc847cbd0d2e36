//! Environment check command.

use console::style;

use crate::config::Config;
use crate::ocr::TextExtractor;

/// Report external tool availability and the configured NER backend.
pub async fn cmd_check(config: &Config) -> anyhow::Result<()> {
    let mut all_found = true;

    println!("\n{}", style("PDF Tools:").cyan());
    for (tool, available) in TextExtractor::check_tools()
        .into_iter()
        .filter(|(tool, _)| tool != "tesseract")
    {
        let status = if available {
            style("✓ found").green()
        } else {
            all_found = false;
            style("✗ not found").red()
        };
        println!("  {:<15} {}", tool, status);
    }

    println!("\n{}", style("OCR Backend:").cyan());
    let extractor = config.text_extractor();
    let ocr = extractor.ocr_backend();
    if ocr.is_available() {
        println!(
            "  {:<15} {}",
            ocr.backend_type().as_str(),
            style("✓ available").green()
        );
    } else {
        all_found = false;
        println!(
            "  {:<15} {}",
            ocr.backend_type().as_str(),
            style("✗ not available").red()
        );
        println!("    {}", style(ocr.availability_hint()).dim());
    }
    println!(
        "  {:<15} {}",
        "language",
        style(&config.ocr.language).dim()
    );

    println!("\n{}", style("NER Backend:").cyan());
    match config.ner_backend() {
        Ok(backend) if backend.is_available() => {
            println!(
                "  {:<15} {}",
                backend.backend_id(),
                style("✓ available").green()
            );
        }
        Ok(backend) => {
            all_found = false;
            println!(
                "  {:<15} {}",
                backend.backend_id(),
                style("✗ not available").red()
            );
        }
        Err(e) => {
            all_found = false;
            println!("  {:<15} {}", config.ner.backend, style(e).red());
        }
    }

    if let Some(path) = &config.source_path {
        println!("\n{} Config: {}", style("→").dim(), path.display());
    }

    if !all_found {
        println!(
            "\n{}",
            style("Some components are missing; affected endpoints will return 503.").yellow()
        );
    } else {
        println!("\n{}", style("All components available.").green());
    }

    Ok(())
}
