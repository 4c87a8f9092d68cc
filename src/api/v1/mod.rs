//! v1 API endpoints

pub mod cache;
pub mod documents;
pub mod translations;

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/translations", post(translations::create_translation))
        .route(
            "/documents",
            get(documents::list_documents).post(documents::upload_document),
        )
        .route("/documents/text", post(documents::process_text))
        .route("/documents/search", get(documents::search_documents))
        .route("/cache", delete(cache::clear_cache))
}
