//! PostgreSQL persistent cache tier

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};

use crate::domain::DomainError;
use crate::domain::cache::{CacheEntry, CacheKey, PersistentCacheTier};

/// Persistent tier over the `translation_cache` table
#[derive(Debug, Clone)]
pub struct PostgresCacheTier {
    pool: PgPool,
}

impl PostgresCacheTier {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_entry(row: &PgRow) -> CacheEntry {
    let usage_count: i64 = row.get("usage_count");

    CacheEntry {
        key: CacheKey::new(
            row.get::<String, _>("source_text"),
            row.get::<String, _>("source_language"),
            row.get::<String, _>("target_language"),
        ),
        translated_text: row.get("translated_text"),
        translation_source: row.get("translation_source"),
        usage_count: u64::try_from(usage_count).unwrap_or_default(),
        last_used: row.get("last_used"),
    }
}

#[async_trait]
impl PersistentCacheTier for PostgresCacheTier {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT source_text, source_language, target_language, translated_text,
                   translation_source, usage_count, last_used
            FROM translation_cache
            WHERE source_hash = md5($1) AND source_text = $1
              AND source_language = $2 AND target_language = $3
            "#,
        )
        .bind(&key.source_text)
        .bind(&key.source_language)
        .bind(&key.target_language)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::cache(format!("Failed to read cache entry: {}", e)))?;

        Ok(row.as_ref().map(row_to_entry))
    }

    async fn upsert(&self, entry: &CacheEntry) -> Result<(), DomainError> {
        let usage_count = i64::try_from(entry.usage_count).unwrap_or(i64::MAX);

        sqlx::query(
            r#"
            INSERT INTO translation_cache
                (source_text, source_language, target_language, translated_text,
                 translation_source, usage_count, last_used)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (source_hash, source_language, target_language) DO UPDATE
            SET source_text = EXCLUDED.source_text,
                translated_text = EXCLUDED.translated_text,
                translation_source = EXCLUDED.translation_source,
                usage_count = EXCLUDED.usage_count,
                last_used = EXCLUDED.last_used
            "#,
        )
        .bind(&entry.key.source_text)
        .bind(&entry.key.source_language)
        .bind(&entry.key.target_language)
        .bind(&entry.translated_text)
        .bind(&entry.translation_source)
        .bind(usage_count)
        .bind(entry.last_used)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::cache(format!("Failed to write cache entry: {}", e)))?;

        Ok(())
    }

    async fn increment_usage(
        &self,
        key: &CacheKey,
        used_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE translation_cache
            SET usage_count = usage_count + 1, last_used = $4
            WHERE source_hash = md5($1) AND source_text = $1
              AND source_language = $2 AND target_language = $3
            "#,
        )
        .bind(&key.source_text)
        .bind(&key.source_language)
        .bind(&key.target_language)
        .bind(used_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::cache(format!("Failed to increment usage: {}", e)))?;

        Ok(())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM translation_cache")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to clear cache: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    use crate::infrastructure::storage::{connect, run_migrations, PostgresConfig};

    #[tokio::test]
    async fn test_long_source_text_round_trips() {
        // Only meaningful when DATABASE_URL points at a database
        let Ok(url) = std::env::var("DATABASE_URL") else {
            return;
        };

        let pool = connect(&PostgresConfig::new(url).with_max_connections(2))
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        let tier = PostgresCacheTier::new(pool);

        let report = "Patient presents with hypertension and mild headache. ".repeat(120);
        assert!(report.len() > 3 * 1024);
        let target = format!("simple-{}", Uuid::new_v4());
        let key = CacheKey::new(report, "medical", target);

        tier.upsert(&CacheEntry::new(key.clone(), "High blood pressure.", "deepseek", Utc::now()))
            .await
            .unwrap();
        tier.increment_usage(&key, Utc::now()).await.unwrap();

        let entry = tier.get(&key).await.unwrap().unwrap();
        assert_eq!(entry.key, key);
        assert_eq!(entry.translated_text, "High blood pressure.");
        assert_eq!(entry.usage_count, 2);

        let other = CacheKey::new("Patient presents", "medical", key.target_language.clone());
        assert!(tier.get(&other).await.unwrap().is_none());
    }
}
