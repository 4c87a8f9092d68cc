//! Lazily launched, shared OCR engine

use std::path::Path;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domain::{DomainError, OcrEngine, OcrLauncher};

#[derive(Debug)]
enum OcrSlot {
    Uninitialized,
    Ready(Arc<dyn OcrEngine>),
    Released,
}

/// Process-wide OCR engine handle
///
/// The engine is launched on first use and released at most once; any use
/// after release fails.
#[derive(Debug)]
pub struct SharedOcrEngine {
    launcher: Arc<dyn OcrLauncher>,
    slot: Mutex<OcrSlot>,
}

impl SharedOcrEngine {
    pub fn new(launcher: Arc<dyn OcrLauncher>) -> Self {
        Self {
            launcher,
            slot: Mutex::new(OcrSlot::Uninitialized),
        }
    }

    async fn acquire(&self) -> Result<Arc<dyn OcrEngine>, DomainError> {
        let mut slot = self.slot.lock().await;

        match &*slot {
            OcrSlot::Ready(engine) => return Ok(engine.clone()),
            OcrSlot::Released => {
                return Err(DomainError::extraction("OCR engine has been released"));
            }
            OcrSlot::Uninitialized => {}
        }

        let engine = self.launcher.launch().await?;
        info!("OCR engine launched");
        *slot = OcrSlot::Ready(engine.clone());

        Ok(engine)
    }

    pub async fn recognize(&self, path: &Path) -> Result<String, DomainError> {
        let engine = self.acquire().await?;
        engine.recognize(path).await
    }

    /// Terminates the engine if it was launched
    ///
    /// Returns whether an engine was terminated by this call.
    pub async fn release(&self) -> Result<bool, DomainError> {
        let previous = std::mem::replace(&mut *self.slot.lock().await, OcrSlot::Released);

        match previous {
            OcrSlot::Ready(engine) => {
                engine.terminate().await?;
                info!("OCR engine released");
                Ok(true)
            }
            OcrSlot::Uninitialized | OcrSlot::Released => {
                debug!("No running OCR engine to release");
                Ok(false)
            }
        }
    }
}
