//! Per-actor, per-provider rate limiter
//!
//! Token buckets refill lazily: a bucket whose window has elapsed is treated
//! as full on read and reset on the next consume.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::domain::DomainError;
use crate::domain::clock::Clock;
use crate::domain::rate_limit::{RateLimitKey, RateLimitPolicy, RateLimitStore};

/// Advisory limiter over a `RateLimitStore`
///
/// `check` and `consume` are separate calls, so two concurrent callers may
/// both pass `check` for the last token; the second `consume` then fails.
#[derive(Debug)]
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    policies: HashMap<String, RateLimitPolicy>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn RateLimitStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            policies: HashMap::new(),
            clock,
        }
    }

    /// Limits calls to `provider_id`; providers without a policy are unlimited
    pub fn with_policy(mut self, provider_id: impl Into<String>, policy: RateLimitPolicy) -> Self {
        self.policies.insert(provider_id.into(), policy);
        self
    }

    /// Whether `actor` may call `provider_id` now
    ///
    /// A store failure denies the call.
    #[instrument(skip(self))]
    pub async fn check(&self, actor: &str, provider_id: &str) -> bool {
        let Some(policy) = self.policies.get(provider_id) else {
            return true;
        };

        let key = RateLimitKey::new(actor, provider_id);
        let now = self.clock.now();

        match self.store.load(&key).await {
            Ok(Some(state)) => {
                let available = state.available(policy, now);
                debug!(available, "Rate limit checked");
                available > 0
            }
            Ok(None) => policy.capacity > 0,
            Err(e) => {
                warn!(error = %e, "Rate limit store unavailable, skipping provider");
                false
            }
        }
    }

    /// Takes one token after a successful call
    #[instrument(skip(self))]
    pub async fn consume(&self, actor: &str, provider_id: &str) -> Result<(), DomainError> {
        let Some(policy) = self.policies.get(provider_id) else {
            return Ok(());
        };

        let key = RateLimitKey::new(actor, provider_id);
        let state = self.store.consume(&key, policy, self.clock.now()).await?;
        debug!(tokens_remaining = state.tokens_remaining, "Rate limit token consumed");

        Ok(())
    }
}
