//! Rate limit state store trait

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{RateLimitKey, RateLimitPolicy, RateLimitState};
use crate::domain::DomainError;

/// Storage for token bucket state
#[async_trait]
pub trait RateLimitStore: Send + Sync + Debug {
    /// Reads the stored bucket without modifying it
    async fn load(&self, key: &RateLimitKey) -> Result<Option<RateLimitState>, DomainError>;

    /// Atomically refills if due and takes one token, returning the new state
    ///
    /// A missing bucket starts full. Fails with `RateLimitExceeded` when no
    /// token is left, leaving the stored state untouched.
    async fn consume(
        &self,
        key: &RateLimitKey,
        policy: &RateLimitPolicy,
        now: DateTime<Utc>,
    ) -> Result<RateLimitState, DomainError>;
}
