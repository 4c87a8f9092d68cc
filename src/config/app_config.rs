use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::{DomainError, RateLimitPolicy};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub cache: CacheConfig,
    /// Translation providers in priority order
    pub providers: ProvidersConfig,
    pub ocr: OcrConfig,
    pub documents: DocumentsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted upload, in bytes
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Falls back to the `DATABASE_URL` environment variable
    pub database_url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entries held by the in-process tier
    pub memory_capacity: usize,
}

/// Wire protocol a provider speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    OpenaiCompatible,
    Anthropic,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub id: String,
    pub kind: ProviderKind,
    #[serde(default)]
    pub base_url: Option<String>,
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Calls per actor per window; unlimited when absent
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_window_secs() -> u64 {
    3600
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_temperature() -> f64 {
    0.3
}

fn default_max_tokens() -> u32 {
    1000
}

impl ProviderConfig {
    pub fn policy(&self) -> Option<RateLimitPolicy> {
        self.capacity
            .map(|capacity| RateLimitPolicy::new(capacity, Duration::from_secs(self.window_secs)))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Ordered provider list
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct ProvidersConfig(pub Vec<ProviderConfig>);

impl ProvidersConfig {
    pub fn iter(&self) -> std::slice::Iter<'_, ProviderConfig> {
        self.0.iter()
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self(vec![
            ProviderConfig {
                id: "deepseek".to_string(),
                kind: ProviderKind::OpenaiCompatible,
                base_url: Some("https://api.deepseek.com".to_string()),
                model: "deepseek-chat".to_string(),
                api_key_env: "DEEPSEEK_API_KEY".to_string(),
                capacity: Some(100),
                window_secs: default_window_secs(),
                timeout_secs: default_timeout_secs(),
                temperature: default_temperature(),
                max_tokens: default_max_tokens(),
            },
            ProviderConfig {
                id: "chatgpt".to_string(),
                kind: ProviderKind::OpenaiCompatible,
                base_url: Some("https://api.openai.com".to_string()),
                model: "gpt-3.5-turbo".to_string(),
                api_key_env: "OPENAI_API_KEY".to_string(),
                capacity: Some(50),
                window_secs: default_window_secs(),
                timeout_secs: default_timeout_secs(),
                temperature: default_temperature(),
                max_tokens: default_max_tokens(),
            },
        ])
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// OCR executable
    pub command: String,
    /// Tesseract language codes, `+`-separated
    pub languages: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocumentsConfig {
    /// Minimum similarity for search hits, between 0 and 1
    pub search_threshold: f64,
    /// Default size of the recent documents listing
    pub recent_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_url: None,
            max_connections: 10,
        }
    }
}

impl StorageConfig {
    pub fn resolve_database_url(&self) -> Option<String> {
        self.database_url
            .clone()
            .or_else(|| std::env::var("DATABASE_URL").ok())
            .filter(|url| !url.trim().is_empty())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            memory_capacity: 1000,
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            command: "tesseract".to_string(),
            languages: "eng".to_string(),
        }
    }
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            search_threshold: 0.3,
            recent_limit: 20,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Rejects settings the pipeline cannot run with
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut ids = HashSet::new();

        for provider in self.providers.iter() {
            if provider.id.trim().is_empty() {
                return Err(DomainError::configuration("provider id must not be empty"));
            }
            if !ids.insert(provider.id.as_str()) {
                return Err(DomainError::configuration(format!(
                    "duplicate provider id '{}'",
                    provider.id
                )));
            }
            if provider.timeout_secs == 0 {
                return Err(DomainError::configuration(format!(
                    "provider '{}' needs a non-zero timeout",
                    provider.id
                )));
            }
            if provider.capacity.is_some() && provider.window_secs == 0 {
                return Err(DomainError::configuration(format!(
                    "provider '{}' needs a non-zero rate limit window",
                    provider.id
                )));
            }
        }

        if self.cache.memory_capacity == 0 {
            return Err(DomainError::configuration(
                "cache.memory_capacity must be at least 1",
            ));
        }

        if !(0.0..=1.0).contains(&self.documents.search_threshold) {
            return Err(DomainError::configuration(
                "documents.search_threshold must be between 0 and 1",
            ));
        }

        if self.storage.backend == StorageBackend::Postgres
            && self.storage.resolve_database_url().is_none()
        {
            return Err(DomainError::configuration(
                "postgres storage requires storage.database_url or DATABASE_URL",
            ));
        }

        Ok(())
    }
}
