//! PostgreSQL rate limit store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};

use crate::domain::DomainError;
use crate::domain::rate_limit::{RateLimitKey, RateLimitPolicy, RateLimitState, RateLimitStore};

/// Rate limit store over the `rate_limits` table
///
/// `consume` runs in a transaction holding a row lock, so concurrent
/// consumers of one bucket serialize on the database.
#[derive(Debug, Clone)]
pub struct PostgresRateLimitStore {
    pool: PgPool,
}

impl PostgresRateLimitStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_state(key: &RateLimitKey, row: &PgRow) -> RateLimitState {
    let tokens: i32 = row.get("tokens_remaining");

    RateLimitState {
        key: key.clone(),
        tokens_remaining: u32::try_from(tokens).unwrap_or_default(),
        last_refill: row.get("last_refill"),
    }
}

fn storage_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::storage(format!("{}: {}", context, e))
}

#[async_trait]
impl RateLimitStore for PostgresRateLimitStore {
    async fn load(&self, key: &RateLimitKey) -> Result<Option<RateLimitState>, DomainError> {
        let row = sqlx::query(
            "SELECT tokens_remaining, last_refill FROM rate_limits WHERE actor_id = $1 AND provider_id = $2",
        )
        .bind(&key.actor_id)
        .bind(&key.provider_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to read rate limit", e))?;

        Ok(row.map(|row| row_to_state(key, &row)))
    }

    async fn consume(
        &self,
        key: &RateLimitKey,
        policy: &RateLimitPolicy,
        now: DateTime<Utc>,
    ) -> Result<RateLimitState, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error("Failed to begin transaction", e))?;

        // Create the bucket full if missing, then lock it
        sqlx::query(
            r#"
            INSERT INTO rate_limits (actor_id, provider_id, tokens_remaining, last_refill)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (actor_id, provider_id) DO NOTHING
            "#,
        )
        .bind(&key.actor_id)
        .bind(&key.provider_id)
        .bind(i32::try_from(policy.capacity).unwrap_or(i32::MAX))
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| storage_error("Failed to initialize rate limit", e))?;

        let row = sqlx::query(
            r#"
            SELECT tokens_remaining, last_refill FROM rate_limits
            WHERE actor_id = $1 AND provider_id = $2
            FOR UPDATE
            "#,
        )
        .bind(&key.actor_id)
        .bind(&key.provider_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| storage_error("Failed to lock rate limit", e))?;

        let mut state = row_to_state(key, &row);
        // Dropping the transaction rolls back on exhaustion
        state.consume(policy, now)?;

        sqlx::query(
            r#"
            UPDATE rate_limits SET tokens_remaining = $3, last_refill = $4
            WHERE actor_id = $1 AND provider_id = $2
            "#,
        )
        .bind(&key.actor_id)
        .bind(&key.provider_id)
        .bind(i32::try_from(state.tokens_remaining).unwrap_or(i32::MAX))
        .bind(state.last_refill)
        .execute(&mut *tx)
        .await
        .map_err(|e| storage_error("Failed to update rate limit", e))?;

        tx.commit()
            .await
            .map_err(|e| storage_error("Failed to commit rate limit", e))?;

        Ok(state)
    }
}
