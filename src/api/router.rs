use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::health;
use super::state::AppState;
use super::v1;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .nest("/v1", v1::create_v1_router())
        .with_state(state)
        .layer(body_limit)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::AppConfig;
    use crate::domain::extraction::{MockOcrEngine, MockOcrLauncher};
    use crate::domain::provider::MockTranslationProvider;
    use crate::infrastructure::llm::ProviderGateway;
    use crate::Pipeline;

    async fn app(providers: Vec<MockTranslationProvider>) -> Router {
        let gateways = providers
            .into_iter()
            .map(|p| ProviderGateway::new(Arc::new(p)))
            .collect();
        let launcher = Arc::new(MockOcrLauncher::new(Arc::new(
            MockOcrEngine::new().with_text("Fracture of left radius."),
        )));

        let pipeline = Pipeline::with_components(&AppConfig::default(), gateways, launcher)
            .await
            .unwrap();

        create_router(pipeline.app_state())
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_lists_providers() {
        let app = app(vec![MockTranslationProvider::new("deepseek").with_response("x")]).await;

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["providers"], json!(["deepseek"]));
    }

    #[tokio::test]
    async fn test_live() {
        let app = app(vec![]).await;

        let response = app
            .oneshot(Request::get("/live").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_translation_round_trip() {
        let app = app(vec![MockTranslationProvider::new("chatgpt").with_response("fever")]).await;
        let body = json!({"text": "fiebre", "source_language": "es", "target_language": "en"});

        let first = app
            .clone()
            .oneshot(json_request("POST", "/v1/translations", body.clone()))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        let first = body_json(first).await;
        assert_eq!(first["translated_text"], "fever");
        assert_eq!(first["source"], "chatgpt");
        assert_eq!(first["cached"], false);

        let second = app
            .oneshot(json_request("POST", "/v1/translations", body))
            .await
            .unwrap();
        assert_eq!(body_json(second).await["cached"], true);
    }

    #[tokio::test]
    async fn test_translation_failure_is_503() {
        let app = app(vec![MockTranslationProvider::new("deepseek").with_error("HTTP 500")]).await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/v1/translations",
                json!({"text": "fiebre", "source_language": "es", "target_language": "en"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert!(
            !body["error"]["message"]
                .as_str()
                .unwrap()
                .contains("deepseek")
        );
    }

    #[tokio::test]
    async fn test_blank_translation_text_is_400() {
        let app = app(vec![]).await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/v1/translations",
                json!({"text": " ", "source_language": "es", "target_language": "en"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_text_document_then_list_and_search() {
        let app = app(vec![]).await;

        let created = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/v1/documents/text",
                json!({"text": "Hypertension noted. Patient reports mild headache."}),
            ))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
        let created = body_json(created).await;
        assert_eq!(created["source"], "text");

        let listed = app
            .clone()
            .oneshot(Request::get("/v1/documents?limit=5").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(listed).await.as_array().unwrap().len(), 1);

        let found = app
            .clone()
            .oneshot(
                Request::get("/v1/documents/search?q=hypertension")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let found = body_json(found).await;
        assert_eq!(found.as_array().unwrap().len(), 1);
        assert_eq!(found[0]["document"]["id"], created["id"]);

        let blank = app
            .oneshot(Request::get("/v1/documents/search?q=").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
    }

    fn multipart_request(file_name: &str, content_type: &str, bytes: &[u8]) -> Request<Body> {
        let boundary = "X-BOUNDARY";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/v1/documents")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_image_upload_is_recognized() {
        let app = app(vec![]).await;

        let response = app
            .oneshot(multipart_request("scan.png", "image/png", &[0x89, 0x50, 0x4e, 0x47]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["source"], "image");
        assert_eq!(body["content"], "Fracture of left radius.");
    }

    #[tokio::test]
    async fn test_unsupported_upload_is_415() {
        let app = app(vec![]).await;

        let response = app
            .oneshot(multipart_request("notes.zip", "application/zip", b"PK"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_422() {
        let app = app(vec![]).await;

        let response = app
            .oneshot(multipart_request("report.pdf", "application/pdf", b"not a pdf"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_clear_cache() {
        let app = app(vec![MockTranslationProvider::new("chatgpt").with_response("fever")]).await;
        app.clone()
            .oneshot(json_request(
                "POST",
                "/v1/translations",
                json!({"text": "fiebre", "source_language": "es", "target_language": "en"}),
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(Request::delete("/v1/cache").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["cleared"], 1);
    }
}
