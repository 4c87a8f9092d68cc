use async_trait::async_trait;
use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;

use crate::domain::DomainError;

/// A running optical character recognition engine
#[async_trait]
pub trait OcrEngine: Send + Sync + Debug {
    /// Recognizes the text of the image at `path`
    async fn recognize(&self, path: &Path) -> Result<String, DomainError>;

    /// Releases the engine's resources
    async fn terminate(&self) -> Result<(), DomainError>;
}

/// Starts OCR engines on demand
#[async_trait]
pub trait OcrLauncher: Send + Sync + Debug {
    async fn launch(&self) -> Result<Arc<dyn OcrEngine>, DomainError>;
}
