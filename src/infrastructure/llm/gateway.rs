//! Provider with its rate limit policy and call timeout

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{DomainError, ProviderRequest, RateLimitPolicy, TranslationProvider};

/// Default bound on a single provider call
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

/// One entry of the orchestrator's ordered provider list
#[derive(Debug, Clone)]
pub struct ProviderGateway {
    provider: Arc<dyn TranslationProvider>,
    policy: Option<RateLimitPolicy>,
    timeout: Duration,
}

impl ProviderGateway {
    pub fn new(provider: Arc<dyn TranslationProvider>) -> Self {
        Self {
            provider,
            policy: None,
            timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    pub fn with_policy(mut self, policy: RateLimitPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn id(&self) -> &str {
        self.provider.id()
    }

    pub fn policy(&self) -> Option<RateLimitPolicy> {
        self.policy
    }

    /// Calls the provider, failing with a provider error once the timeout elapses
    pub async fn attempt_translate(&self, request: &ProviderRequest) -> Result<String, DomainError> {
        match tokio::time::timeout(self.timeout, self.provider.attempt_translate(request)).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::provider(
                self.id(),
                format!("timed out after {}ms", self.timeout.as_millis()),
            )),
        }
    }
}
