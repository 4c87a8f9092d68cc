use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::http_client::HttpClientTrait;
use crate::domain::{DomainError, ProviderRequest, TranslationProvider};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";

/// Any back-end speaking the OpenAI chat completions protocol (OpenAI, DeepSeek, ...)
#[derive(Debug)]
pub struct ChatCompletionsProvider<C: HttpClientTrait> {
    id: String,
    client: C,
    auth_header: String,
    base_url: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl<C: HttpClientTrait> ChatCompletionsProvider<C> {
    pub fn new(
        id: impl Into<String>,
        client: C,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            client,
            auth_header: format!("Bearer {}", api_key.into()),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: model.into(),
            temperature: 0.3,
            max_tokens: 1000,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn build_request(&self, request: &ProviderRequest) -> serde_json::Value {
        let messages = [
            ChatMessage {
                role: "system",
                content: &request.system_instruction,
            },
            ChatMessage {
                role: "user",
                content: &request.text,
            },
        ];

        serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        })
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<String, DomainError> {
        let response: ChatCompletionResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider(&self.id, format!("Failed to parse response: {}", e))
        })?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| DomainError::provider(&self.id, "No content in response"))
    }
}

#[async_trait]
impl<C: HttpClientTrait> TranslationProvider for ChatCompletionsProvider<C> {
    fn id(&self) -> &str {
        &self.id
    }

    async fn attempt_translate(&self, request: &ProviderRequest) -> Result<String, DomainError> {
        let url = self.chat_completions_url();
        let body = self.build_request(request);
        let response = self
            .client
            .post_json(&self.id, &url, &self.headers(), &body)
            .await?;

        self.parse_response(response)
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}
