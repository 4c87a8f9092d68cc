//! In-memory document store

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{Document, DocumentRepository, DomainError, ScoredDocument};

/// Documents kept in process memory, for development and tests
#[derive(Debug, Default)]
pub struct InMemoryDocumentRepository {
    documents: RwLock<Vec<Document>>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Trigrams of each alphanumeric word, padded the way pg_trgm pads them
fn trigrams(text: &str) -> HashSet<String> {
    let mut grams = HashSet::new();

    for word in text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let padded: Vec<char> = format!("  {} ", word).chars().collect();
        for window in padded.windows(3) {
            grams.insert(window.iter().collect());
        }
    }

    grams
}

/// Share of the query's trigrams found in `text`, between 0 and 1
pub fn word_similarity(query: &str, text: &str) -> f64 {
    let query_grams = trigrams(query);
    if query_grams.is_empty() {
        return 0.0;
    }

    let text_grams = trigrams(text);
    let shared = query_grams.intersection(&text_grams).count();

    shared as f64 / query_grams.len() as f64
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn insert(&self, document: Document) -> Result<Document, DomainError> {
        self.documents.write().await.push(document.clone());
        Ok(document)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Document>, DomainError> {
        let documents = self.documents.read().await;
        let mut recent: Vec<Document> = documents.iter().rev().cloned().collect();

        // Stable, so equal timestamps stay newest-inserted first
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        recent.truncate(limit);

        Ok(recent)
    }

    async fn search(
        &self,
        query: &str,
        threshold: f64,
    ) -> Result<Vec<ScoredDocument>, DomainError> {
        let documents = self.documents.read().await;

        let mut hits: Vec<ScoredDocument> = documents
            .iter()
            .map(|document| ScoredDocument {
                relevance: word_similarity(query, &document.content),
                document: document.clone(),
            })
            .filter(|hit| hit.relevance >= threshold && hit.relevance > 0.0)
            .collect();

        hits.sort_by(|a, b| {
            b.relevance
                .total_cmp(&a.relevance)
                .then_with(|| b.document.timestamp.cmp(&a.document.timestamp))
        });

        Ok(hits)
    }
}
