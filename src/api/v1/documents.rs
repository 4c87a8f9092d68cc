//! Document endpoint handlers

use axum::extract::{Multipart, Query, State};
use axum::http::{HeaderMap, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::translations::actor_from;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{Document, ScoredDocument, UploadedFile};

/// Multipart field carrying the upload
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct ProcessTextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ListDocumentsQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SearchDocumentsQuery {
    #[serde(default)]
    pub q: String,
}

/// POST /v1/documents
pub async fn upload_document(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    let file = read_file_field(&mut multipart).await?;
    debug!(mime_type = %file.mime_type, size = file.bytes.len(), "Document uploaded");

    let document = state
        .document_service
        .process_file(&file, &actor_from(&headers))
        .await?;

    Ok((StatusCode::CREATED, Json(document)))
}

async fn read_file_field(multipart: &mut Multipart) -> Result<UploadedFile, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?;

        return Ok(UploadedFile::from_named(
            file_name,
            content_type.as_deref(),
            bytes,
        ));
    }

    Err(ApiError::bad_request("Missing multipart field 'file'").with_param(FILE_FIELD))
}

/// POST /v1/documents/text
pub async fn process_text(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ProcessTextRequest>,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    let document = state
        .document_service
        .process_text(&body.text, &actor_from(&headers))
        .await?;

    Ok((StatusCode::CREATED, Json(document)))
}

/// GET /v1/documents
pub async fn list_documents(
    State(state): State<AppState>,
    Query(query): Query<ListDocumentsQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let limit = query.limit.unwrap_or(state.recent_limit);
    let documents = state.document_service.recent(limit).await?;

    Ok(Json(documents))
}

/// GET /v1/documents/search
pub async fn search_documents(
    State(state): State<AppState>,
    Query(query): Query<SearchDocumentsQuery>,
) -> Result<Json<Vec<ScoredDocument>>, ApiError> {
    let hits = state.document_service.search(&query.q).await?;

    Ok(Json(hits))
}
