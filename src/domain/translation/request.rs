//! Translation request and result types

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::domain::cache::CacheKey;
use crate::domain::document::MedicalTerm;

/// Actor used when the caller does not identify itself
pub const ANONYMOUS_ACTOR: &str = "anonymous";

/// Pseudo-language of clinical source text
pub const MEDICAL_LANGUAGE: &str = "medical";

/// Pseudo-language of the plain-language rewrite
pub const SIMPLE_LANGUAGE: &str = "simple";

/// A request to translate text between two languages on behalf of an actor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    pub source_language: String,
    pub target_language: String,
    #[serde(default = "default_actor")]
    pub actor: String,
}

fn default_actor() -> String {
    ANONYMOUS_ACTOR.to_string()
}

impl TranslationRequest {
    pub fn new(
        text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
            actor: default_actor(),
        }
    }

    /// Medical-term identification and plain-language rewrite of `text`
    pub fn simplification(text: impl Into<String>) -> Self {
        Self::new(text, MEDICAL_LANGUAGE, SIMPLE_LANGUAGE)
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        let actor = actor.into();
        if !actor.trim().is_empty() {
            self.actor = actor;
        }
        self
    }

    /// Rejects requests with a blank text or language
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.text.trim().is_empty() {
            return Err(DomainError::validation("text must not be empty"));
        }

        if self.source_language.trim().is_empty() {
            return Err(DomainError::validation("source language must not be empty"));
        }

        if self.target_language.trim().is_empty() {
            return Err(DomainError::validation("target language must not be empty"));
        }

        Ok(())
    }

    pub fn is_simplification(&self) -> bool {
        self.source_language == MEDICAL_LANGUAGE && self.target_language == SIMPLE_LANGUAGE
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(&self.text, &self.source_language, &self.target_language)
    }
}

/// Outcome of a successful translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub translated_text: String,
    /// Id of the provider that produced the text
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_terms: Option<Vec<MedicalTerm>>,
    /// Whether the result was served from cache
    #[serde(default)]
    pub cached: bool,
}
