//! API error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Error categories reported to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    UnsupportedMediaTypeError,
    ExtractionError,
    ServerError,
    ServiceUnavailableError,
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, error_type: ApiErrorType, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    message: message.into(),
                    error_type,
                    param: None,
                },
            },
        }
    }

    /// Names the offending request field
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.response.error.param = Some(param.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorType::InvalidRequestError, message)
    }

    pub fn unsupported_media_type(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiErrorType::UnsupportedMediaTypeError,
            message,
        )
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            ApiErrorType::ExtractionError,
            message,
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ApiErrorType::ServerError, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            ApiErrorType::ServiceUnavailableError,
            message,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { message } => Self::bad_request(message),
            DomainError::UnsupportedFileType { mime_type } => {
                Self::unsupported_media_type(format!("Unsupported file type: {}", mime_type))
                    .with_param("file")
            }
            DomainError::Extraction { message } => Self::unprocessable(message),
            err @ (DomainError::TranslationFailed { .. }
            | DomainError::Provider { .. }
            | DomainError::RateLimitExceeded { .. }
            | DomainError::Cancelled) => Self::unavailable(err.to_string()),
            DomainError::Storage { message }
            | DomainError::Cache { message }
            | DomainError::Configuration { message } => Self::internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_status_mapping() {
        let cases = [
            (DomainError::validation("empty"), StatusCode::BAD_REQUEST),
            (
                DomainError::unsupported_file_type("application/zip"),
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ),
            (
                DomainError::extraction("corrupt PDF"),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                DomainError::translation_failed("No translation provider available"),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (DomainError::Cancelled, StatusCode::SERVICE_UNAVAILABLE),
            (
                DomainError::storage("connection refused"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (domain, status) in cases {
            assert_eq!(ApiError::from(domain).status, status);
        }
    }

    #[test]
    fn test_unsupported_type_names_file_param() {
        let err = ApiError::from(DomainError::unsupported_file_type("text/csv"));

        assert_eq!(err.response.error.param.as_deref(), Some("file"));
        assert!(err.response.error.message.contains("text/csv"));
    }

    #[test]
    fn test_error_serialization() {
        let err = ApiError::unavailable("Translation failed: No translation provider available");
        let json = serde_json::to_string(&err.response).unwrap();

        assert!(json.contains("\"type\":\"service_unavailable_error\""));
        assert!(!json.contains("param"));
    }
}
