//! Tesseract command line OCR engine

use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::{DomainError, OcrEngine, OcrLauncher};

/// Launches `tesseract` engines after checking the binary runs
#[derive(Debug, Clone)]
pub struct TesseractLauncher {
    command: String,
    languages: String,
}

impl TesseractLauncher {
    pub fn new(command: impl Into<String>, languages: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            languages: languages.into(),
        }
    }
}

#[async_trait]
impl OcrLauncher for TesseractLauncher {
    async fn launch(&self) -> Result<Arc<dyn OcrEngine>, DomainError> {
        let output = Command::new(&self.command)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                DomainError::extraction(format!("Failed to start OCR engine '{}': {}", self.command, e))
            })?;

        if !output.status.success() {
            return Err(DomainError::extraction(format!(
                "OCR engine '{}' is not usable ({})",
                self.command, output.status
            )));
        }

        Ok(Arc::new(TesseractEngine {
            command: self.command.clone(),
            languages: self.languages.clone(),
            terminated: AtomicBool::new(false),
        }))
    }
}

/// Runs one `tesseract` process per recognized image
#[derive(Debug)]
pub struct TesseractEngine {
    command: String,
    languages: String,
    terminated: AtomicBool,
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn recognize(&self, path: &Path) -> Result<String, DomainError> {
        if self.terminated.load(Ordering::SeqCst) {
            return Err(DomainError::extraction("OCR engine has been terminated"));
        }

        debug!(path = %path.display(), languages = %self.languages, "Running OCR");

        let output = Command::new(&self.command)
            .arg(path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.languages)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| DomainError::extraction(format!("Failed to run OCR: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DomainError::extraction(format!(
                "OCR failed ({}): {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn terminate(&self) -> Result<(), DomainError> {
        self.terminated.store(true, Ordering::SeqCst);
        Ok(())
    }
}
