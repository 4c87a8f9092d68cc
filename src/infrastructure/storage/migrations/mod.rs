//! Database migrations infrastructure

use sqlx::postgres::PgPool;
use tracing::info;

use crate::domain::DomainError;

/// Applies embedded migrations to PostgreSQL, recording them in `_migrations`
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the migrations table if it doesn't exist
    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

        Ok(())
    }

    /// Runs a single migration unless it is already recorded
    ///
    /// Returns whether the migration was applied by this call.
    pub async fn run_migration(&self, migration: &Migration) -> Result<bool, DomainError> {
        self.ensure_migrations_table().await?;

        let applied: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)")
                .bind(migration.version)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::storage(format!("Failed to check migration status: {}", e))
                })?;

        if applied {
            return Ok(false);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        // Multiple statements need the simple query protocol
        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to run migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(migration.description)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to record migration {}: {}",
                    migration.version, e
                ))
            })?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit migration: {}", e)))?;

        Ok(true)
    }

    /// Returns the latest applied migration version
    pub async fn current_version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        sqlx::query_scalar("SELECT MAX(version) FROM _migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get migration version: {}", e)))
    }
}

/// An embedded schema change
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: i64,
    pub description: &'static str,
    pub up: &'static str,
}

/// Every migration of the pipeline schema, in version order
pub fn pipeline_migrations() -> Vec<Migration> {
    vec![
        Migration {
            version: 1,
            description: "Create translation_cache table",
            up: r#"
            CREATE TABLE IF NOT EXISTS translation_cache (
                source_text TEXT NOT NULL,
                source_hash TEXT GENERATED ALWAYS AS (md5(source_text)) STORED,
                source_language VARCHAR(64) NOT NULL,
                target_language VARCHAR(64) NOT NULL,
                translated_text TEXT NOT NULL,
                translation_source VARCHAR(128) NOT NULL,
                usage_count BIGINT NOT NULL DEFAULT 1,
                last_used TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                PRIMARY KEY (source_hash, source_language, target_language)
            );
            CREATE INDEX IF NOT EXISTS idx_translation_cache_last_used ON translation_cache(last_used);
            "#,
        },
        Migration {
            version: 2,
            description: "Create rate_limits table",
            up: r#"
            CREATE TABLE IF NOT EXISTS rate_limits (
                actor_id VARCHAR(255) NOT NULL,
                provider_id VARCHAR(128) NOT NULL,
                tokens_remaining INTEGER NOT NULL CHECK (tokens_remaining >= 0),
                last_refill TIMESTAMPTZ NOT NULL,
                PRIMARY KEY (actor_id, provider_id)
            );
            "#,
        },
        Migration {
            version: 3,
            description: "Create translation_errors table",
            up: r#"
            CREATE TABLE IF NOT EXISTS translation_errors (
                id BIGSERIAL PRIMARY KEY,
                source_text TEXT NOT NULL,
                source_language VARCHAR(64) NOT NULL,
                target_language VARCHAR(64) NOT NULL,
                error_message TEXT NOT NULL,
                timestamp TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            "#,
        },
        Migration {
            version: 4,
            description: "Create medical_reports table",
            up: r#"
            CREATE EXTENSION IF NOT EXISTS pg_trgm;
            CREATE TABLE IF NOT EXISTS medical_reports (
                id UUID PRIMARY KEY,
                content TEXT NOT NULL,
                source VARCHAR(16) NOT NULL,
                timestamp TIMESTAMPTZ NOT NULL,
                keywords JSONB NOT NULL DEFAULT '[]',
                summary TEXT NOT NULL,
                simplified_content TEXT NOT NULL,
                medical_terms JSONB NOT NULL DEFAULT '[]'
            );
            CREATE INDEX IF NOT EXISTS idx_medical_reports_timestamp ON medical_reports(timestamp DESC);
            CREATE INDEX IF NOT EXISTS idx_medical_reports_content_trgm
                ON medical_reports USING GIN (content gin_trgm_ops);
            "#,
        },
    ]
}

/// Runs all pending pipeline migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), DomainError> {
    let migrator = PostgresMigrator::new(pool.clone());

    for migration in pipeline_migrations() {
        if migrator.run_migration(&migration).await? {
            info!(
                version = migration.version,
                description = migration.description,
                "Applied migration"
            );
        }
    }

    let version = migrator.current_version().await?;
    info!(version = ?version, "Database schema up to date");

    Ok(())
}
