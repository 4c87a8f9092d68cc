use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// What a translation provider is asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    pub system_instruction: String,
    pub text: String,
}

impl ProviderRequest {
    pub fn new(system_instruction: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            text: text.into(),
        }
    }
}

/// An external AI back-end able to turn one request into generated text
#[async_trait]
pub trait TranslationProvider: Send + Sync + Debug {
    /// Stable provider identifier, used for rate limiting and cache attribution
    fn id(&self) -> &str;

    /// Perform one attempt, returning the generated text
    async fn attempt_translate(&self, request: &ProviderRequest) -> Result<String, DomainError>;
}
