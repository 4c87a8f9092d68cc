//! Translation cache administration

use axum::extract::State;
use serde::Serialize;
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::Json;

#[derive(Debug, Serialize)]
pub struct ClearCacheResponse {
    /// Entries dropped from the in-process tier
    pub cleared: usize,
}

/// DELETE /v1/cache
pub async fn clear_cache(State(state): State<AppState>) -> Json<ClearCacheResponse> {
    let cleared = state.translation_service.clear_cache().await;
    info!(cleared, "Translation cache cleared");

    Json(ClearCacheResponse { cleared })
}
