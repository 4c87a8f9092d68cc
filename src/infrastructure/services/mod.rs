//! Infrastructure services

mod document_service;
mod translation_service;

pub use document_service::{DEFAULT_SEARCH_THRESHOLD, DocumentService};
pub use translation_service::{NO_PROVIDER_AVAILABLE, TranslationService};
