//! In-memory rate limit store

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::DomainError;
use crate::domain::rate_limit::{RateLimitKey, RateLimitPolicy, RateLimitState, RateLimitStore};

/// Bucket state kept in process memory
///
/// `consume` holds the write lock across read, refill and decrement.
#[derive(Debug, Default)]
pub struct InMemoryRateLimitStore {
    states: RwLock<HashMap<RateLimitKey, RateLimitState>>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RateLimitStore for InMemoryRateLimitStore {
    async fn load(&self, key: &RateLimitKey) -> Result<Option<RateLimitState>, DomainError> {
        Ok(self.states.read().await.get(key).cloned())
    }

    async fn consume(
        &self,
        key: &RateLimitKey,
        policy: &RateLimitPolicy,
        now: DateTime<Utc>,
    ) -> Result<RateLimitState, DomainError> {
        let mut states = self.states.write().await;

        let mut state = states
            .get(key)
            .cloned()
            .unwrap_or_else(|| RateLimitState::full(key.clone(), policy, now));

        state.consume(policy, now)?;
        states.insert(key.clone(), state.clone());

        Ok(state)
    }
}
