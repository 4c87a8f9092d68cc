//! Rate limit domain - token buckets per actor and provider

mod state;
mod store;

pub use state::{RateLimitKey, RateLimitPolicy, RateLimitState};
pub use store::RateLimitStore;

#[cfg(test)]
pub use store::mock::FailingRateLimitStore;
