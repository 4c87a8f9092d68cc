//! Persistent cache tier trait

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{CacheEntry, CacheKey};
use crate::domain::DomainError;

/// Unbounded, durable tier behind the in-process cache
#[async_trait]
pub trait PersistentCacheTier: Send + Sync + Debug {
    /// Looks up an entry by its exact key
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, DomainError>;

    /// Inserts or replaces the entry for its key
    async fn upsert(&self, entry: &CacheEntry) -> Result<(), DomainError>;

    /// Increments the stored usage count and refreshes `last_used`
    async fn increment_usage(
        &self,
        key: &CacheKey,
        used_at: DateTime<Utc>,
    ) -> Result<(), DomainError>;

    /// Removes every entry
    async fn clear(&self) -> Result<(), DomainError>;
}
