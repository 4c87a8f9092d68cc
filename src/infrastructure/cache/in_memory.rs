//! Unbounded in-memory stand-in for the persistent cache tier

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::DomainError;
use crate::domain::cache::{CacheEntry, CacheKey, PersistentCacheTier};

/// Persistent tier kept in process memory, for development and tests
#[derive(Debug, Default)]
pub struct InMemoryPersistentTier {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl InMemoryPersistentTier {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersistentCacheTier for InMemoryPersistentTier {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, DomainError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn upsert(&self, entry: &CacheEntry) -> Result<(), DomainError> {
        self.entries
            .write()
            .await
            .insert(entry.key.clone(), entry.clone());
        Ok(())
    }

    async fn increment_usage(
        &self,
        key: &CacheKey,
        used_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if let Some(entry) = self.entries.write().await.get_mut(key) {
            entry.touch(used_at);
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.entries.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_replaces_and_increment_counts() {
        let tier = InMemoryPersistentTier::new();
        let key = CacheKey::new("cough", "en", "de");
        let now = Utc::now();

        tier.upsert(&CacheEntry::new(key.clone(), "Husten", "deepseek", now))
            .await
            .unwrap();
        tier.increment_usage(&key, now).await.unwrap();
        tier.increment_usage(&key, now).await.unwrap();

        let stored = tier.get(&key).await.unwrap().unwrap();
        assert_eq!(stored.usage_count, 3);

        tier.upsert(&CacheEntry::new(key.clone(), "Reizhusten", "chatgpt", now))
            .await
            .unwrap();
        let stored = tier.get(&key).await.unwrap().unwrap();
        assert_eq!(stored.translated_text, "Reizhusten");
        assert_eq!(stored.usage_count, 1);
    }

    #[tokio::test]
    async fn test_increment_of_missing_key_is_noop() {
        let tier = InMemoryPersistentTier::new();
        let key = CacheKey::new("a", "b", "c");

        tier.increment_usage(&key, Utc::now()).await.unwrap();

        assert!(tier.get(&key).await.unwrap().is_none());
    }
}
