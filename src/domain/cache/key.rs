//! Cache key and entry types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of a cached translation
///
/// Matching is exact on all three strings; no trimming or case folding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CacheKey {
    pub source_text: String,
    pub source_language: String,
    pub target_language: String,
}

impl CacheKey {
    pub fn new(
        source_text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            source_text: source_text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }
}

/// A cached translation with usage bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub translated_text: String,
    /// Id of the provider that produced the translation
    pub translation_source: String,
    pub usage_count: u64,
    pub last_used: DateTime<Utc>,
}

impl CacheEntry {
    /// Creates a freshly produced entry with a usage count of one
    pub fn new(
        key: CacheKey,
        translated_text: impl Into<String>,
        translation_source: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            key,
            translated_text: translated_text.into(),
            translation_source: translation_source.into(),
            usage_count: 1,
            last_used: now,
        }
    }

    /// Records a cache hit
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.usage_count = self.usage_count.saturating_add(1);
        self.last_used = now;
    }
}
