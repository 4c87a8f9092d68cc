//! Translate command - one translation from the command line

use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::domain::TranslationRequest;
use crate::domain::translation::ANONYMOUS_ACTOR;
use crate::Pipeline;

/// Arguments for the translate command
#[derive(Args, Clone, Debug)]
pub struct TranslateArgs {
    /// Text to translate
    #[arg(long)]
    pub text: String,

    /// Source language, or `medical` for a plain-language rewrite
    #[arg(long = "from")]
    pub source_language: String,

    /// Target language, or `simple` for a plain-language rewrite
    #[arg(long = "to")]
    pub target_language: String,

    /// Caller id for rate limiting
    #[arg(long)]
    pub actor: Option<String>,
}

impl TranslateArgs {
    fn to_request(&self) -> TranslationRequest {
        TranslationRequest::new(&self.text, &self.source_language, &self.target_language)
            .with_actor(self.actor.as_deref().unwrap_or(ANONYMOUS_ACTOR))
    }
}

/// Translate once, cancelling on Ctrl+C
pub async fn run(args: TranslateArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    let pipeline = Pipeline::init(&config).await?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, cancelling translation");
            on_interrupt.cancel();
        }
    });

    let result = pipeline
        .translation_service
        .translate_with_cancellation(args.to_request(), &cancel)
        .await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
