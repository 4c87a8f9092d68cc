//! Translation provider implementations

mod anthropic;
mod factory;
mod gateway;
mod http_client;
mod openai;

pub use anthropic::{AnthropicProvider, DEFAULT_ANTHROPIC_BASE_URL};
pub use factory::ProviderFactory;
pub use gateway::{DEFAULT_PROVIDER_TIMEOUT, ProviderGateway};
pub use http_client::{HttpClient, HttpClientTrait};
pub use openai::{ChatCompletionsProvider, DEFAULT_DEEPSEEK_BASE_URL, DEFAULT_OPENAI_BASE_URL};
