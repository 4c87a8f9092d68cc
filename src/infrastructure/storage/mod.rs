//! Storage infrastructure - PostgreSQL pool and schema

pub mod migrations;
mod postgres;

pub use migrations::{Migration, PostgresMigrator, run_migrations};
pub use postgres::{PostgresConfig, connect};
