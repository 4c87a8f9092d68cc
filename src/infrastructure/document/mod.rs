//! Document store implementations

mod in_memory;
mod postgres;

pub use in_memory::{InMemoryDocumentRepository, word_similarity};
pub use postgres::PostgresDocumentRepository;
