//! Error sink implementations

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::{DomainError, ErrorSink, TranslationErrorRecord};

/// Keeps failed translations in process memory
#[derive(Debug, Default)]
pub struct InMemoryErrorSink {
    records: RwLock<Vec<TranslationErrorRecord>>,
}

impl InMemoryErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn records(&self) -> Vec<TranslationErrorRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl ErrorSink for InMemoryErrorSink {
    async fn record(&self, record: TranslationErrorRecord) -> Result<(), DomainError> {
        self.records.write().await.push(record);
        Ok(())
    }
}

/// Appends failed translations to the `translation_errors` table
#[derive(Debug, Clone)]
pub struct PostgresErrorSink {
    pool: PgPool,
}

impl PostgresErrorSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ErrorSink for PostgresErrorSink {
    async fn record(&self, record: TranslationErrorRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO translation_errors
                (source_text, source_language, target_language, error_message, timestamp)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&record.source_text)
        .bind(&record.source_language)
        .bind(&record.target_language)
        .bind(&record.error_message)
        .bind(record.timestamp)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to record translation error: {}", e)))?;

        debug!("Translation error recorded");
        Ok(())
    }
}
