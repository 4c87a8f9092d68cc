//! Cache infrastructure - tiered translation cache and persistent tiers

mod in_memory;
mod memory_tier;
mod postgres;
mod tiered;

pub use in_memory::InMemoryPersistentTier;
pub use memory_tier::{DEFAULT_MEMORY_CAPACITY, MemoryTier};
pub use postgres::PostgresCacheTier;
pub use tiered::TieredCache;
