//! Two-tier translation cache

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::memory_tier::MemoryTier;
use crate::domain::cache::{CacheEntry, CacheKey, PersistentCacheTier};
use crate::domain::clock::Clock;

/// In-process tier in front of a persistent tier
///
/// Persistent tier failures never reach callers: reads degrade to a miss and
/// writes are logged.
#[derive(Debug)]
pub struct TieredCache {
    memory: Mutex<MemoryTier>,
    persistent: Arc<dyn PersistentCacheTier>,
    clock: Arc<dyn Clock>,
}

impl TieredCache {
    pub fn new(
        capacity: usize,
        persistent: Arc<dyn PersistentCacheTier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            memory: Mutex::new(MemoryTier::new(capacity)),
            persistent,
            clock,
        }
    }

    /// Looks up a translation, counting the hit
    #[instrument(skip(self, key), fields(source_language = %key.source_language, target_language = %key.target_language))]
    pub async fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        let now = self.clock.now();

        if let Some(entry) = self.memory.lock().await.get(key, now) {
            debug!(usage_count = entry.usage_count, "In-process cache hit");
            return Some(entry);
        }

        let mut entry = match self.persistent.get(key).await {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                debug!("Cache miss");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Persistent cache read failed, treating as miss");
                return None;
            }
        };

        entry.touch(now);
        self.promote(entry.clone()).await;

        let persistent = self.persistent.clone();
        let key = key.clone();
        tokio::spawn(async move {
            if let Err(e) = persistent.increment_usage(&key, now).await {
                warn!(error = %e, "Failed to persist cache usage count");
            }
        });

        debug!(usage_count = entry.usage_count, "Persistent cache hit");
        Some(entry)
    }

    /// Stores a translation in both tiers
    #[instrument(skip(self, entry), fields(provider = %entry.translation_source))]
    pub async fn set(&self, entry: CacheEntry) {
        if let Err(e) = self.persistent.upsert(&entry).await {
            warn!(error = %e, "Persistent cache write failed");
        }

        self.promote(entry).await;
    }

    /// Empties both tiers, returning the number of in-process entries dropped
    pub async fn clear(&self) -> usize {
        let cleared = self.memory.lock().await.clear();

        if let Err(e) = self.persistent.clear().await {
            warn!(error = %e, "Failed to clear persistent cache");
        }

        cleared
    }

    pub async fn memory_len(&self) -> usize {
        self.memory.lock().await.len()
    }

    async fn promote(&self, entry: CacheEntry) {
        let evicted = self.memory.lock().await.insert(entry);

        for entry in evicted {
            debug!(
                last_used = %entry.last_used,
                usage_count = entry.usage_count,
                "Evicted in-process cache entry"
            );
        }
    }
}
