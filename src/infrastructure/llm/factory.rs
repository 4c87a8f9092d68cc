use std::sync::Arc;

use tracing::{info, warn};

use super::anthropic::AnthropicProvider;
use super::gateway::ProviderGateway;
use super::http_client::HttpClient;
use super::openai::ChatCompletionsProvider;
use crate::config::{ProviderConfig, ProviderKind, ProvidersConfig};
use crate::domain::{DomainError, TranslationProvider};

/// Builds provider gateways from configuration
#[derive(Debug)]
pub struct ProviderFactory;

impl ProviderFactory {
    /// Creates one provider with the given API key
    pub fn create(
        config: &ProviderConfig,
        api_key: &str,
    ) -> Result<Arc<dyn TranslationProvider>, DomainError> {
        let http_client = HttpClient::new();

        let provider: Arc<dyn TranslationProvider> = match config.kind {
            ProviderKind::OpenaiCompatible => {
                let mut provider = ChatCompletionsProvider::new(
                    &config.id,
                    http_client,
                    api_key,
                    &config.model,
                )
                .with_temperature(config.temperature)
                .with_max_tokens(config.max_tokens);

                if let Some(ref base_url) = config.base_url {
                    provider = provider.with_base_url(base_url);
                }
                Arc::new(provider)
            }
            ProviderKind::Anthropic => {
                let mut provider =
                    AnthropicProvider::new(&config.id, http_client, api_key, &config.model)
                        .with_temperature(config.temperature)
                        .with_max_tokens(config.max_tokens);

                if let Some(ref base_url) = config.base_url {
                    provider = provider.with_base_url(base_url);
                }
                Arc::new(provider)
            }
        };

        Ok(provider)
    }

    /// Wraps a provider in its configured policy and timeout
    pub fn gateway(config: &ProviderConfig, provider: Arc<dyn TranslationProvider>) -> ProviderGateway {
        let gateway = ProviderGateway::new(provider).with_timeout(config.timeout());

        match config.policy() {
            Some(policy) => gateway.with_policy(policy),
            None => gateway,
        }
    }

    /// Builds gateways in priority order, resolving keys with `lookup_key`
    ///
    /// Providers whose key is unset are skipped with a warning.
    pub fn create_gateways<F>(
        providers: &ProvidersConfig,
        lookup_key: F,
    ) -> Result<Vec<ProviderGateway>, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut gateways = Vec::new();

        for config in providers.iter() {
            let Some(api_key) = lookup_key(&config.api_key_env).filter(|k| !k.trim().is_empty())
            else {
                warn!(
                    provider = %config.id,
                    env = %config.api_key_env,
                    "API key not set, provider disabled"
                );
                continue;
            };

            let provider = Self::create(config, &api_key)?;
            info!(provider = %config.id, model = %config.model, "Provider enabled");
            gateways.push(Self::gateway(config, provider));
        }

        Ok(gateways)
    }

    /// Builds gateways reading API keys from the process environment
    pub fn from_env(providers: &ProvidersConfig) -> Result<Vec<ProviderGateway>, DomainError> {
        Self::create_gateways(providers, |name| std::env::var(name).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::domain::RateLimitPolicy;

    #[test]
    fn test_skips_providers_without_key() {
        let config = AppConfig::default();

        let gateways = ProviderFactory::create_gateways(&config.providers, |name| {
            (name == "OPENAI_API_KEY").then(|| "sk-test".to_string())
        })
        .unwrap();

        assert_eq!(gateways.len(), 1);
        assert_eq!(gateways[0].id(), "chatgpt");
        assert_eq!(gateways[0].policy(), Some(RateLimitPolicy::per_hour(50)));
    }

    #[test]
    fn test_keeps_priority_order() {
        let config = AppConfig::default();

        let gateways =
            ProviderFactory::create_gateways(&config.providers, |_| Some("key".to_string()))
                .unwrap();

        let ids: Vec<_> = gateways.iter().map(|g| g.id()).collect();
        assert_eq!(ids, vec!["deepseek", "chatgpt"]);
    }

    #[test]
    fn test_blank_key_counts_as_unset() {
        let config = AppConfig::default();

        let gateways =
            ProviderFactory::create_gateways(&config.providers, |_| Some("  ".to_string()))
                .unwrap();

        assert!(gateways.is_empty());
    }

    #[test]
    fn test_create_anthropic_provider() {
        let config: ProviderConfig = serde_json::from_value(serde_json::json!({
            "id": "claude",
            "kind": "anthropic",
            "model": "claude-3-haiku",
            "api_key_env": "ANTHROPIC_API_KEY"
        }))
        .unwrap();

        let provider = ProviderFactory::create(&config, "key").unwrap();

        assert_eq!(provider.id(), "claude");
    }
}
