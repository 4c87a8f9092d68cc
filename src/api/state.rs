//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::services::{DocumentService, TranslationService};

/// Default page size of `GET /v1/documents`
pub const DEFAULT_RECENT_LIMIT: usize = 20;

/// Handles shared by every request handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub translation_service: Arc<TranslationService>,
    pub document_service: Arc<DocumentService>,
    /// Page size when `limit` is not given
    pub recent_limit: usize,
    /// Largest accepted request body
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        translation_service: Arc<TranslationService>,
        document_service: Arc<DocumentService>,
    ) -> Self {
        Self {
            translation_service,
            document_service,
            recent_limit: DEFAULT_RECENT_LIMIT,
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }

    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit;
        self
    }

    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }
}
