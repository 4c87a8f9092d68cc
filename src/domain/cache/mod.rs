//! Cache domain - translation cache keys, entries and the persistent tier

mod key;
mod repository;

pub use key::{CacheEntry, CacheKey};
pub use repository::PersistentCacheTier;

#[cfg(test)]
pub use repository::mock::MockPersistentTier;
