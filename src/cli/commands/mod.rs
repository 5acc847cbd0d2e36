//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod check;
mod entities;
mod extract;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "docextract")]
#[command(about = "OCR, PDF text extraction and named entity recognition services")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Start the OCR service (/ocr, /pdf-extract, /ocr-base64)
    ServeOcr {
        /// Address to bind to: PORT, HOST, or HOST:PORT (default: server.host and PORT)
        bind: Option<String>,
    },

    /// Start the NER service (/extract)
    ServeNer {
        /// Address to bind to: PORT, HOST, or HOST:PORT (default: server.host and NER_PORT)
        bind: Option<String>,
    },

    /// Check external tools and the configured NER backend
    Check,

    /// Extract text from an image or PDF and print it as JSON
    Extract {
        /// Image or PDF file
        file: PathBuf,

        /// Per-page PDF breakdown (same output as /pdf-extract)
        #[arg(short, long)]
        detailed: bool,
    },

    /// Extract named entities from text and print them as JSON
    Entities {
        /// Text to analyse, or "-" to read stdin
        text: String,
    },
}

/// Resolve configuration: explicit file if given, otherwise discovery.
async fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            let path = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref());
            let config = Config::load_from_path(&path)
                .await
                .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
            Ok(config.with_env_overrides())
        }
        None => Ok(Config::load().await),
    }
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config).await?;

    if let Some(path) = &config.source_path {
        tracing::info!("Using config {}", path.display());
    }

    match cli.command {
        Commands::ServeOcr { bind } => serve::cmd_serve_ocr(&config, bind.as_deref()).await,
        Commands::ServeNer { bind } => serve::cmd_serve_ner(&config, bind.as_deref()).await,
        Commands::Check => check::cmd_check(&config).await,
        Commands::Extract { file, detailed } => {
            extract::cmd_extract(&config, &file, detailed).await
        }
        Commands::Entities { text } => entities::cmd_entities(&config, &text).await,
    }
}
