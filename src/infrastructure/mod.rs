//! Infrastructure layer - External service implementations

pub mod analysis;
pub mod cache;
pub mod document;
pub mod error_sink;
pub mod extraction;
pub mod llm;
pub mod logging;
pub mod rate_limit;
pub mod services;
pub mod storage;
