//! Document store trait

use async_trait::async_trait;

use super::{Document, ScoredDocument};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Append-only store of processed documents
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Persists a new document
    async fn insert(&self, document: Document) -> Result<Document, DomainError>;

    /// Lists the most recent documents, newest first
    async fn recent(&self, limit: usize) -> Result<Vec<Document>, DomainError>;

    /// Text-similarity search returning documents scoring at least `threshold`, best first
    async fn search(&self, query: &str, threshold: f64)
    -> Result<Vec<ScoredDocument>, DomainError>;
}
