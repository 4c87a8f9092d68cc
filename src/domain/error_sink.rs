//! Record of translations that no provider could serve

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use super::DomainError;
use super::translation::TranslationRequest;

/// One failed translation, kept for later inspection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationErrorRecord {
    pub source_text: String,
    pub source_language: String,
    pub target_language: String,
    pub error_message: String,
    pub timestamp: DateTime<Utc>,
}

impl TranslationErrorRecord {
    pub fn from_request(
        request: &TranslationRequest,
        error_message: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            source_text: request.text.clone(),
            source_language: request.source_language.clone(),
            target_language: request.target_language.clone(),
            error_message: error_message.into(),
            timestamp,
        }
    }
}

/// Append-only destination for `TranslationErrorRecord`s
#[async_trait]
pub trait ErrorSink: Send + Sync + Debug {
    async fn record(&self, record: TranslationErrorRecord) -> Result<(), DomainError>;
}
