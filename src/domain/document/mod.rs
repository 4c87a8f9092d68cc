//! Document domain - processed medical reports

mod entity;
mod repository;

pub use entity::{Analysis, Document, DocumentSource, MedicalTerm, ScoredDocument, dedupe_terms};
pub use repository::DocumentRepository;

#[cfg(test)]
pub use repository::MockDocumentRepository;
