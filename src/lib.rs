//! Medical Translator
//!
//! Turns medical documents into plain-language text:
//! - PDF and image text extraction (lopdf, Tesseract OCR)
//! - Keyword, summary and medical term analysis
//! - Cached translation with per-actor rate limits and provider fallback
//! - Document storage with similarity search

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::{info, warn};

use api::state::AppState;
use config::StorageBackend;
use domain::{
    Clock, DocumentRepository, DomainError, ErrorSink, OcrLauncher, PersistentCacheTier,
    RateLimitStore, SystemClock,
};
use infrastructure::{
    analysis::ContentAnalyzer,
    cache::{InMemoryPersistentTier, PostgresCacheTier, TieredCache},
    document::{InMemoryDocumentRepository, PostgresDocumentRepository},
    error_sink::{InMemoryErrorSink, PostgresErrorSink},
    extraction::{ContentExtractor, LopdfDecoder, SharedOcrEngine, TesseractLauncher},
    llm::{ProviderFactory, ProviderGateway},
    rate_limit::{InMemoryRateLimitStore, PostgresRateLimitStore, RateLimiter},
    services::{DocumentService, TranslationService},
    storage::{connect, run_migrations, PostgresConfig},
};

/// Backing stores selected by `storage.backend`
struct Stores {
    cache: Arc<dyn PersistentCacheTier>,
    rate_limits: Arc<dyn RateLimitStore>,
    errors: Arc<dyn ErrorSink>,
    documents: Arc<dyn DocumentRepository>,
}

impl Stores {
    fn in_memory() -> Self {
        Self {
            cache: Arc::new(InMemoryPersistentTier::new()),
            rate_limits: Arc::new(InMemoryRateLimitStore::new()),
            errors: Arc::new(InMemoryErrorSink::new()),
            documents: Arc::new(InMemoryDocumentRepository::new()),
        }
    }

    async fn postgres(config: &AppConfig) -> Result<Self, DomainError> {
        let settings = PostgresConfig::from_storage(&config.storage).ok_or_else(|| {
            DomainError::configuration("storage.database_url or DATABASE_URL is required")
        })?;

        let pool = connect(&settings).await?;
        run_migrations(&pool).await?;

        Ok(Self {
            cache: Arc::new(PostgresCacheTier::new(pool.clone())),
            rate_limits: Arc::new(PostgresRateLimitStore::new(pool.clone())),
            errors: Arc::new(PostgresErrorSink::new(pool.clone())),
            documents: Arc::new(PostgresDocumentRepository::new(pool)),
        })
    }
}

/// The wired pipeline: translation orchestrator plus document service
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub translation_service: Arc<TranslationService>,
    pub document_service: Arc<DocumentService>,
    config: AppConfig,
}

impl Pipeline {
    /// Builds the pipeline with providers whose API keys are set in the environment
    pub async fn init(config: &AppConfig) -> Result<Self, DomainError> {
        let gateways = ProviderFactory::from_env(&config.providers)?;
        if gateways.is_empty() {
            warn!("No translation provider configured, analysis will run degraded");
        }

        let launcher = Arc::new(TesseractLauncher::new(
            &config.ocr.command,
            &config.ocr.languages,
        ));

        Self::with_components(config, gateways, launcher).await
    }

    /// Builds the pipeline around the given provider gateways and OCR launcher
    pub async fn with_components(
        config: &AppConfig,
        gateways: Vec<ProviderGateway>,
        ocr_launcher: Arc<dyn OcrLauncher>,
    ) -> Result<Self, DomainError> {
        config.validate()?;

        let stores = match config.storage.backend {
            StorageBackend::Memory => Stores::in_memory(),
            StorageBackend::Postgres => Stores::postgres(config).await?,
        };
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let limiter = gateways.iter().fold(
            RateLimiter::new(stores.rate_limits, clock.clone()),
            |limiter, gateway| match gateway.policy() {
                Some(policy) => limiter.with_policy(gateway.id(), policy),
                None => limiter,
            },
        );

        let cache = TieredCache::new(config.cache.memory_capacity, stores.cache, clock.clone());

        let translation_service = Arc::new(TranslationService::new(
            Arc::new(cache),
            Arc::new(limiter),
            gateways,
            stores.errors,
            clock.clone(),
        ));

        let extractor = ContentExtractor::new(
            Arc::new(LopdfDecoder::new()),
            Arc::new(SharedOcrEngine::new(ocr_launcher)),
        );
        let analyzer = ContentAnalyzer::new(translation_service.clone());

        let document_service = Arc::new(
            DocumentService::new(
                Arc::new(extractor),
                Arc::new(analyzer),
                stores.documents,
                clock,
            )
            .with_search_threshold(config.documents.search_threshold),
        );

        info!(
            backend = ?config.storage.backend,
            providers = ?translation_service.provider_ids(),
            "Pipeline initialized"
        );

        Ok(Self {
            translation_service,
            document_service,
            config: config.clone(),
        })
    }

    /// State for the HTTP handlers
    pub fn app_state(&self) -> AppState {
        AppState::new(
            self.translation_service.clone(),
            self.document_service.clone(),
        )
        .with_recent_limit(self.config.documents.recent_limit)
        .with_max_upload_bytes(self.config.server.max_upload_bytes)
    }

    /// Releases the OCR engine
    pub async fn shutdown(&self) -> Result<(), DomainError> {
        if self.document_service.shutdown().await? {
            info!("OCR engine released");
        }
        Ok(())
    }
}
