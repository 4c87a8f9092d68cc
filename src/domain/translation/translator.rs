use async_trait::async_trait;

use super::{TranslationRequest, TranslationResult};
use crate::domain::DomainError;

/// Capability to translate text, implemented by the translation orchestrator
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        request: TranslationRequest,
    ) -> Result<TranslationResult, DomainError>;
}
