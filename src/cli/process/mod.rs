//! Process command - extract, analyze and store a local file

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::{info, warn};

use crate::domain::translation::ANONYMOUS_ACTOR;
use crate::domain::UploadedFile;
use crate::Pipeline;

/// Arguments for the process command
#[derive(Args, Clone, Debug)]
pub struct ProcessArgs {
    /// PDF or image to process
    pub path: PathBuf,

    /// MIME type, guessed from the file name when omitted
    #[arg(long)]
    pub mime: Option<String>,

    /// Caller id for rate limiting
    #[arg(long)]
    pub actor: Option<String>,
}

/// Reads `args.path` into an upload
pub async fn read_upload(args: &ProcessArgs) -> anyhow::Result<UploadedFile> {
    let bytes = tokio::fs::read(&args.path)
        .await
        .with_context(|| format!("Failed to read {}", args.path.display()))?;

    let file_name = args
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(UploadedFile::from_named(file_name, args.mime.as_deref(), bytes))
}

pub async fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    let pipeline = Pipeline::init(&config).await?;

    let file = read_upload(&args).await?;
    info!(path = %args.path.display(), mime_type = %file.mime_type, "Processing file");

    let outcome = pipeline
        .document_service
        .process_file(&file, args.actor.as_deref().unwrap_or(ANONYMOUS_ACTOR))
        .await;

    if let Err(e) = pipeline.shutdown().await {
        warn!(error = %e, "Failed to release OCR engine");
    }

    let document = outcome?;
    println!("{}", serde_json::to_string_pretty(&document)?);

    Ok(())
}
