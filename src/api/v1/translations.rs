//! Translation endpoint handlers

use axum::extract::State;
use axum::http::HeaderMap;
use serde::Deserialize;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::translation::ANONYMOUS_ACTOR;
use crate::domain::{TranslationRequest, TranslationResult, Translator};

/// Header identifying the caller for rate limiting
pub const ACTOR_HEADER: &str = "x-actor-id";

#[derive(Debug, Deserialize)]
pub struct CreateTranslationRequest {
    pub text: String,
    pub source_language: String,
    pub target_language: String,
}

/// Caller id from the actor header, `anonymous` when absent or blank
pub fn actor_from(headers: &HeaderMap) -> String {
    headers
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|actor| !actor.is_empty())
        .unwrap_or(ANONYMOUS_ACTOR)
        .to_string()
}

/// POST /v1/translations
pub async fn create_translation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateTranslationRequest>,
) -> Result<Json<TranslationResult>, ApiError> {
    let actor = actor_from(&headers);
    debug!(actor = %actor, "Translation requested");

    let request = TranslationRequest::new(body.text, body.source_language, body.target_language)
        .with_actor(actor);

    let result = state.translation_service.translate(request).await?;

    Ok(Json(result))
}
