//! Token bucket policy and per-actor state

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Token bucket configuration for one provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitPolicy {
    /// Tokens granted per window
    pub capacity: u32,
    /// Window length after which the bucket is refilled
    pub window: Duration,
}

impl RateLimitPolicy {
    pub fn new(capacity: u32, window: Duration) -> Self {
        Self { capacity, window }
    }

    /// `capacity` calls per hour
    pub fn per_hour(capacity: u32) -> Self {
        Self::new(capacity, Duration::from_secs(3600))
    }

    fn window_elapsed(&self, since: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let window = chrono::Duration::from_std(self.window).unwrap_or(chrono::Duration::MAX);
        now.signed_duration_since(since) >= window
    }
}

/// Identity a bucket is tracked against
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RateLimitKey {
    pub actor_id: String,
    pub provider_id: String,
}

impl RateLimitKey {
    pub fn new(actor_id: impl Into<String>, provider_id: impl Into<String>) -> Self {
        Self {
            actor_id: actor_id.into(),
            provider_id: provider_id.into(),
        }
    }
}

/// Remaining tokens of one `(actor, provider)` bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitState {
    pub key: RateLimitKey,
    pub tokens_remaining: u32,
    /// Start of the current window
    pub last_refill: DateTime<Utc>,
}

impl RateLimitState {
    /// A full bucket whose window starts at `now`
    pub fn full(key: RateLimitKey, policy: &RateLimitPolicy, now: DateTime<Utc>) -> Self {
        Self {
            key,
            tokens_remaining: policy.capacity,
            last_refill: now,
        }
    }

    pub fn is_expired(&self, policy: &RateLimitPolicy, now: DateTime<Utc>) -> bool {
        policy.window_elapsed(self.last_refill, now)
    }

    /// Tokens available at `now`, counting a due refill without applying it
    pub fn available(&self, policy: &RateLimitPolicy, now: DateTime<Utc>) -> u32 {
        if self.is_expired(policy, now) {
            policy.capacity
        } else {
            self.tokens_remaining
        }
    }

    /// Resets the bucket if its window has elapsed
    pub fn refill_if_due(&mut self, policy: &RateLimitPolicy, now: DateTime<Utc>) {
        if self.is_expired(policy, now) {
            self.tokens_remaining = policy.capacity;
            self.last_refill = now;
        }
    }

    /// Refills if due, then takes one token
    pub fn consume(&mut self, policy: &RateLimitPolicy, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.refill_if_due(policy, now);

        if self.tokens_remaining == 0 {
            return Err(DomainError::rate_limit_exceeded(
                &self.key.actor_id,
                &self.key.provider_id,
            ));
        }

        self.tokens_remaining -= 1;
        Ok(())
    }
}
