//! Domain layer - Core business logic and entities

pub mod cache;
pub mod clock;
pub mod document;
pub mod error;
pub mod error_sink;
pub mod extraction;
pub mod provider;
pub mod rate_limit;
pub mod translation;

pub use cache::{CacheEntry, CacheKey, PersistentCacheTier};
pub use clock::{Clock, SystemClock};
pub use document::{
    Analysis, Document, DocumentRepository, DocumentSource, MedicalTerm, ScoredDocument,
};
pub use error::DomainError;
pub use error_sink::{ErrorSink, TranslationErrorRecord};
pub use extraction::{ExtractedText, OcrEngine, OcrLauncher, PdfTextDecoder, UploadedFile};
pub use provider::{ProviderRequest, TranslationProvider};
pub use rate_limit::{RateLimitKey, RateLimitPolicy, RateLimitState, RateLimitStore};
pub use translation::{TranslationRequest, TranslationResult, Translator};
