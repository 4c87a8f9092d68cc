//! Translation orchestration over cache, rate limiter and provider gateways

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::domain::clock::Clock;
use crate::domain::translation::{interpret, system_instruction};
use crate::domain::{
    CacheEntry, DomainError, ErrorSink, ProviderRequest, TranslationErrorRecord,
    TranslationRequest, TranslationResult, Translator,
};
use crate::infrastructure::cache::TieredCache;
use crate::infrastructure::llm::ProviderGateway;
use crate::infrastructure::rate_limit::RateLimiter;

/// Message of the failure returned when every provider was skipped or failed
pub const NO_PROVIDER_AVAILABLE: &str = "No translation provider available";

/// Serves translations from cache, falling back across providers in priority order
pub struct TranslationService {
    cache: Arc<TieredCache>,
    limiter: Arc<RateLimiter>,
    gateways: Vec<ProviderGateway>,
    error_sink: Arc<dyn ErrorSink>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for TranslationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let providers: Vec<&str> = self.gateways.iter().map(|g| g.id()).collect();
        f.debug_struct("TranslationService")
            .field("providers", &providers)
            .finish_non_exhaustive()
    }
}

impl TranslationService {
    pub fn new(
        cache: Arc<TieredCache>,
        limiter: Arc<RateLimiter>,
        gateways: Vec<ProviderGateway>,
        error_sink: Arc<dyn ErrorSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            cache,
            limiter,
            gateways,
            error_sink,
            clock,
        }
    }

    /// Provider ids in the order they are tried
    pub fn provider_ids(&self) -> Vec<String> {
        self.gateways.iter().map(|g| g.id().to_string()).collect()
    }

    /// Empties both cache tiers, returning how many in-process entries were dropped
    pub async fn clear_cache(&self) -> usize {
        self.cache.clear().await
    }

    /// Translates `request`, giving up with `Cancelled` once `cancel` fires
    ///
    /// A provider answer that loses the race against cancellation is discarded:
    /// no token is consumed and nothing is cached.
    #[instrument(
        skip(self, request, cancel),
        fields(
            actor = %request.actor,
            source_language = %request.source_language,
            target_language = %request.target_language
        )
    )]
    pub async fn translate_with_cancellation(
        &self,
        request: TranslationRequest,
        cancel: &CancellationToken,
    ) -> Result<TranslationResult, DomainError> {
        request.validate()?;

        if cancel.is_cancelled() {
            return Err(DomainError::Cancelled);
        }

        let key = request.cache_key();
        if let Some(entry) = self.cache.get(&key).await {
            debug!(provider = %entry.translation_source, "Serving translation from cache");
            return Ok(to_result(&request, &entry.translated_text, entry.translation_source, true));
        }

        let provider_request = ProviderRequest::new(system_instruction(&request), &request.text);
        let mut last_error: Option<String> = None;

        for gateway in &self.gateways {
            let provider = gateway.id();

            if !self.limiter.check(&request.actor, provider).await {
                info!(provider, "Provider rate limited, skipping");
                continue;
            }

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(provider, "Translation cancelled");
                    return Err(DomainError::Cancelled);
                }
                outcome = gateway.attempt_translate(&provider_request) => outcome,
            };

            let generated = match outcome {
                Ok(generated) => generated,
                Err(e) => {
                    warn!(provider, error = %e, "Provider failed, trying next");
                    last_error = Some(e.to_string());
                    continue;
                }
            };

            if let Err(e) = self.limiter.consume(&request.actor, provider).await {
                warn!(provider, error = %e, "Failed to consume rate limit token");
            }

            self.cache
                .set(CacheEntry::new(key, &generated, provider, self.clock.now()))
                .await;

            info!(provider, "Translation completed");
            return Ok(to_result(&request, &generated, provider.to_string(), false));
        }

        let detail = last_error.unwrap_or_else(|| "all providers rate limited".to_string());
        let record = TranslationErrorRecord::from_request(&request, detail, self.clock.now());
        if let Err(e) = self.error_sink.record(record).await {
            warn!(error = %e, "Failed to record translation error");
        }

        Err(DomainError::translation_failed(NO_PROVIDER_AVAILABLE))
    }
}

fn to_result(
    request: &TranslationRequest,
    generated: &str,
    source: String,
    cached: bool,
) -> TranslationResult {
    let interpretation = interpret(request, generated);

    TranslationResult {
        translated_text: interpretation.text,
        source,
        medical_terms: interpretation.medical_terms,
        cached,
    }
}

#[async_trait]
impl Translator for TranslationService {
    async fn translate(
        &self,
        request: TranslationRequest,
    ) -> Result<TranslationResult, DomainError> {
        self.translate_with_cancellation(request, &CancellationToken::new())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::domain::RateLimitPolicy;
    use crate::domain::clock::mock::ManualClock;
    use crate::domain::error_sink::mock::MockErrorSink;
    use crate::domain::provider::MockTranslationProvider;
    use crate::infrastructure::cache::InMemoryPersistentTier;
    use crate::infrastructure::rate_limit::InMemoryRateLimitStore;

    struct Harness {
        service: TranslationService,
        cache: Arc<TieredCache>,
        sink: Arc<MockErrorSink>,
    }

    fn harness(providers: Vec<Arc<MockTranslationProvider>>, policies: &[(&str, u32)]) -> Harness {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new());
        let cache = Arc::new(TieredCache::new(
            10,
            Arc::new(InMemoryPersistentTier::new()),
            clock.clone(),
        ));

        let mut limiter = RateLimiter::new(Arc::new(InMemoryRateLimitStore::new()), clock.clone());
        for (id, capacity) in policies {
            limiter = limiter.with_policy(*id, RateLimitPolicy::per_hour(*capacity));
        }

        let gateways = providers
            .into_iter()
            .map(|p| ProviderGateway::new(p))
            .collect();
        let sink = Arc::new(MockErrorSink::new());

        Harness {
            service: TranslationService::new(
                cache.clone(),
                Arc::new(limiter),
                gateways,
                sink.clone(),
                clock,
            ),
            cache,
            sink,
        }
    }

    fn request() -> TranslationRequest {
        TranslationRequest::new("fiebre", "es", "en")
    }

    #[tokio::test]
    async fn test_falls_back_to_next_provider_and_caches_its_answer() {
        let a = Arc::new(MockTranslationProvider::new("a").with_error("HTTP 500"));
        let b = Arc::new(MockTranslationProvider::new("b").with_response("fever"));
        let h = harness(vec![a.clone(), b.clone()], &[]);

        let result = h.service.translate(request()).await.unwrap();

        assert_eq!(result.translated_text, "fever");
        assert_eq!(result.source, "b");
        assert!(!result.cached);
        assert_eq!(a.calls(), 1);

        let entry = h.cache.get(&request().cache_key()).await.unwrap();
        assert_eq!(entry.translated_text, "fever");
        assert_eq!(entry.translation_source, "b");
    }

    #[tokio::test]
    async fn test_cache_hit_skips_providers() {
        let a = Arc::new(MockTranslationProvider::new("a").with_response("fever"));
        let h = harness(vec![a.clone()], &[]);

        h.service.translate(request()).await.unwrap();
        let second = h.service.translate(request()).await.unwrap();

        assert!(second.cached);
        assert_eq!(second.source, "a");
        assert_eq!(second.translated_text, "fever");
        assert_eq!(a.calls(), 1);
    }

    #[tokio::test]
    async fn test_rate_limited_provider_is_skipped() {
        let a = Arc::new(MockTranslationProvider::new("a").with_response("from a"));
        let b = Arc::new(MockTranslationProvider::new("b").with_response("from b"));
        let h = harness(vec![a.clone(), b.clone()], &[("a", 1)]);

        let first = h.service.translate(request()).await.unwrap();
        let second = h
            .service
            .translate(TranslationRequest::new("tos", "es", "en"))
            .await
            .unwrap();

        assert_eq!(first.source, "a");
        assert_eq!(second.source, "b");
        assert_eq!(a.calls(), 1);
    }

    #[tokio::test]
    async fn test_limits_are_per_actor() {
        let a = Arc::new(MockTranslationProvider::new("a").with_response("from a"));
        let h = harness(vec![a.clone()], &[("a", 1)]);

        h.service
            .translate(request().with_actor("alice"))
            .await
            .unwrap();
        let other = h
            .service
            .translate(TranslationRequest::new("tos", "es", "en").with_actor("bob"))
            .await
            .unwrap();

        assert_eq!(other.source, "a");
        assert_eq!(a.calls(), 2);
    }

    #[tokio::test]
    async fn test_all_providers_failing_records_error() {
        let a = Arc::new(MockTranslationProvider::new("a").with_error("HTTP 500"));
        let b = Arc::new(MockTranslationProvider::new("b").with_error("HTTP 503"));
        let h = harness(vec![a, b], &[]);

        let err = h.service.translate(request()).await.unwrap_err();

        assert!(matches!(err, DomainError::TranslationFailed { .. }));
        assert_eq!(
            err.to_string(),
            format!("Translation failed: {}", NO_PROVIDER_AVAILABLE)
        );

        let records = h.sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source_text, "fiebre");
        assert!(records[0].error_message.contains("HTTP 503"));
        assert!(h.cache.get(&request().cache_key()).await.is_none());
    }

    #[tokio::test]
    async fn test_no_providers_fails() {
        let h = harness(vec![], &[]);

        let err = h.service.translate(request()).await.unwrap_err();

        assert!(matches!(err, DomainError::TranslationFailed { .. }));
    }

    #[tokio::test]
    async fn test_blank_text_is_rejected_before_providers() {
        let a = Arc::new(MockTranslationProvider::new("a").with_response("x"));
        let h = harness(vec![a.clone()], &[]);

        let err = h
            .service
            .translate(TranslationRequest::new("  ", "es", "en"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
        assert_eq!(a.calls(), 0);
        assert!(h.sink.records().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_neither_caches_nor_consumes() {
        let slow = Arc::new(
            MockTranslationProvider::new("a")
                .with_response("fever")
                .with_delay(Duration::from_secs(5)),
        );
        let h = harness(vec![slow.clone()], &[("a", 1)]);
        let cancel = CancellationToken::new();

        let canceller = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(1)).await;
                cancel.cancel();
            })
        };

        let err = h
            .service
            .translate_with_cancellation(request(), &cancel)
            .await
            .unwrap_err();
        canceller.await.unwrap();

        assert!(matches!(err, DomainError::Cancelled));
        assert!(h.cache.get(&request().cache_key()).await.is_none());

        // The single token is still available
        let fast = h
            .service
            .translate_with_cancellation(request(), &CancellationToken::new())
            .await;
        assert!(fast.is_ok());
        assert_eq!(slow.calls(), 2);
    }

    #[tokio::test]
    async fn test_simplification_extracts_medical_terms() {
        let a = Arc::new(MockTranslationProvider::new("a").with_response(
            r#"{"simplified_text": "High blood pressure.", "medical_terms": [{"term": "Hypertension", "explanation": "high blood pressure"}]}"#,
        ));
        let h = harness(vec![a.clone()], &[]);

        let result = h
            .service
            .translate(TranslationRequest::simplification("Hypertension."))
            .await
            .unwrap();

        assert_eq!(result.translated_text, "High blood pressure.");
        assert_eq!(result.medical_terms.unwrap()[0].term, "Hypertension");
        assert!(a.requests()[0].system_instruction.contains("medical_terms"));
        assert_eq!(a.requests()[0].text, "Hypertension.");
    }
}
