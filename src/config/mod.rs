//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, CacheConfig, DocumentsConfig, LogFormat, LoggingConfig, OcrConfig, ProviderConfig,
    ProviderKind, ProvidersConfig, ServerConfig, StorageBackend, StorageConfig,
};
