//! One-shot entity extraction.

use std::io::Read;

use serde_json::json;

use crate::config::Config;

/// Run NER over `text` (or stdin when `-`) and print `{"entities": [...]}`.
pub async fn cmd_entities(config: &Config, text: &str) -> anyhow::Result<()> {
    let text = if text == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        text.to_string()
    };

    let backend = config.ner_backend()?;
    tracing::info!("Extracting entities with {} backend", backend.backend_id());

    let entities = tokio::task::spawn_blocking(move || backend.extract(&text)).await??;

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({ "entities": entities }))?
    );
    Ok(())
}
