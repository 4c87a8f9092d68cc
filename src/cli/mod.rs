//! CLI module for the medical translator
//!
//! Subcommands:
//! - `serve`: HTTP API server
//! - `translate`: one translation through the provider chain
//! - `process`: extract, analyze and store one local file

pub mod process;
pub mod serve;
pub mod translate;

use clap::{Parser, Subcommand};
use tracing::warn;

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Medical Translator - plain-language medical documents
#[derive(Parser)]
#[command(name = "medical-translator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Translate text and print the result as JSON
    Translate(translate::TranslateArgs),

    /// Process a PDF or image and print the stored document as JSON
    Process(process::ProcessArgs),
}

/// Loads `.env` and configuration, then installs logging
///
/// Falls back to defaults when the configuration cannot be read.
pub(crate) fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let loaded = AppConfig::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();
    logging::init_logging(&config.logging)?;

    if let Err(e) = loaded {
        warn!(error = %e, "Failed to load configuration, using defaults");
    }

    Ok(config)
}
