//! PostgreSQL document store with pg_trgm search

use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};

use crate::domain::{Document, DocumentRepository, DocumentSource, DomainError, ScoredDocument};

const DOCUMENT_COLUMNS: &str =
    "id, content, source, timestamp, keywords, summary, simplified_content, medical_terms";

/// Document store over the `medical_reports` table
#[derive(Debug, Clone)]
pub struct PostgresDocumentRepository {
    pool: PgPool,
}

impl PostgresDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_document(row: &PgRow) -> Result<Document, DomainError> {
    let source: String = row.get("source");
    let keywords: serde_json::Value = row.get("keywords");
    let medical_terms: serde_json::Value = row.get("medical_terms");

    Ok(Document {
        id: row.get("id"),
        content: row.get("content"),
        source: source.parse::<DocumentSource>()?,
        timestamp: row.get("timestamp"),
        keywords: serde_json::from_value(keywords)
            .map_err(|e| DomainError::storage(format!("Invalid keywords column: {}", e)))?,
        summary: row.get("summary"),
        simplified_content: row.get("simplified_content"),
        medical_terms: serde_json::from_value(medical_terms)
            .map_err(|e| DomainError::storage(format!("Invalid medical_terms column: {}", e)))?,
    })
}

#[async_trait]
impl DocumentRepository for PostgresDocumentRepository {
    async fn insert(&self, document: Document) -> Result<Document, DomainError> {
        let keywords = serde_json::to_value(&document.keywords)
            .map_err(|e| DomainError::storage(format!("Failed to serialize keywords: {}", e)))?;
        let medical_terms = serde_json::to_value(&document.medical_terms).map_err(|e| {
            DomainError::storage(format!("Failed to serialize medical terms: {}", e))
        })?;

        sqlx::query(
            r#"
            INSERT INTO medical_reports
                (id, content, source, timestamp, keywords, summary, simplified_content, medical_terms)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(document.id)
        .bind(&document.content)
        .bind(document.source.as_str())
        .bind(document.timestamp)
        .bind(&keywords)
        .bind(&document.summary)
        .bind(&document.simplified_content)
        .bind(&medical_terms)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to save document: {}", e)))?;

        Ok(document)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Document>, DomainError> {
        let query = format!(
            "SELECT {} FROM medical_reports ORDER BY timestamp DESC LIMIT $1",
            DOCUMENT_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to load documents: {}", e)))?;

        rows.iter().map(row_to_document).collect()
    }

    async fn search(
        &self,
        query: &str,
        threshold: f64,
    ) -> Result<Vec<ScoredDocument>, DomainError> {
        let sql = format!(
            r#"
            SELECT {}, word_similarity($1, content)::float8 AS relevance
            FROM medical_reports
            WHERE word_similarity($1, content) >= $2
            ORDER BY relevance DESC, timestamp DESC
            "#,
            DOCUMENT_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(query)
            .bind(threshold as f32)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to search documents: {}", e)))?;

        rows.iter()
            .map(|row| {
                Ok(ScoredDocument {
                    relevance: row.get("relevance"),
                    document: row_to_document(row)?,
                })
            })
            .collect()
    }
}
