//! JSON-over-HTTPS transport shared by the provider adapters

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::DomainError;

/// Longest error body quoted back in a provider error
const MAX_ERROR_BODY_CHARS: usize = 500;

/// POSTs a JSON body and returns the JSON answer
///
/// Every failure is a `DomainError::Provider` labelled with `provider`, so the
/// orchestrator treats transport problems like any other provider failure.
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn post_json(
        &self,
        provider: &str,
        url: &str,
        headers: &[(&str, &str)],
        body: &Value,
    ) -> Result<Value, DomainError>;
}

/// reqwest-backed transport
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self::default()
    }
}

fn truncate_body(body: &str) -> String {
    let mut chars = body.chars();
    let head: String = chars.by_ref().take(MAX_ERROR_BODY_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn post_json(
        &self,
        provider: &str,
        url: &str,
        headers: &[(&str, &str)],
        body: &Value,
    ) -> Result<Value, DomainError> {
        let request = headers
            .iter()
            .fold(self.client.post(url), |request, (name, value)| {
                request.header(*name, *value)
            });

        let response = request
            .json(body)
            .send()
            .await
            .map_err(|e| DomainError::provider(provider, format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(DomainError::provider(
                provider,
                format!("HTTP {}: {}", status, truncate_body(&error_body)),
            ));
        }

        response.json().await.map_err(|e| {
            DomainError::provider(provider, format!("Invalid JSON response: {}", e))
        })
    }
}
