//! Rate limit infrastructure - limiter and bucket stores

mod in_memory;
mod limiter;
mod postgres;

pub use in_memory::InMemoryRateLimitStore;
pub use limiter::RateLimiter;
pub use postgres::PostgresRateLimitStore;
