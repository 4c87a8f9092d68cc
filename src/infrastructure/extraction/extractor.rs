//! Uploaded file to raw text

use std::sync::Arc;

use tracing::{debug, instrument};

use super::ocr::SharedOcrEngine;
use crate::domain::{
    DocumentSource, DomainError, ExtractedText, PdfTextDecoder, UploadedFile,
};

const PDF_MIME: &str = "application/pdf";

/// Dispatches uploads to PDF decoding or OCR by MIME type
#[derive(Debug)]
pub struct ContentExtractor {
    pdf: Arc<dyn PdfTextDecoder>,
    ocr: Arc<SharedOcrEngine>,
}

impl ContentExtractor {
    pub fn new(pdf: Arc<dyn PdfTextDecoder>, ocr: Arc<SharedOcrEngine>) -> Self {
        Self { pdf, ocr }
    }

    #[instrument(skip(self, file), fields(mime_type = %file.mime_type, size = file.bytes.len()))]
    pub async fn extract(&self, file: &UploadedFile) -> Result<ExtractedText, DomainError> {
        let mime = file.essence();

        if mime == PDF_MIME {
            let text = self.extract_pdf(file).await?;
            return Ok(ExtractedText::new(text, DocumentSource::Pdf));
        }

        if mime.starts_with("image/") {
            let text = self.extract_image(file, &mime).await?;
            return Ok(ExtractedText::new(text, DocumentSource::Image));
        }

        Err(DomainError::unsupported_file_type(file.mime_type.clone()))
    }

    /// Releases the OCR engine
    pub async fn shutdown(&self) -> Result<bool, DomainError> {
        self.ocr.release().await
    }

    async fn extract_pdf(&self, file: &UploadedFile) -> Result<String, DomainError> {
        let decoder = self.pdf.clone();
        let bytes = file.bytes.clone();

        let pages = tokio::task::spawn_blocking(move || decoder.page_texts(&bytes))
            .await
            .map_err(|e| DomainError::extraction(format!("PDF decoding task failed: {}", e)))??;

        debug!(pages = pages.len(), "PDF decoded");
        Ok(pages.join("\n").trim().to_string())
    }

    async fn extract_image(&self, file: &UploadedFile, mime: &str) -> Result<String, DomainError> {
        let extension = file
            .extension()
            .or_else(|| {
                mime_guess::get_mime_extensions_str(mime)
                    .and_then(|exts| exts.first())
                    .map(|ext| ext.to_string())
            })
            .unwrap_or_else(|| "img".to_string());

        // Removed on drop, whether recognition succeeds or not
        let image = tempfile::Builder::new()
            .prefix("ocr-")
            .suffix(&format!(".{}", extension))
            .tempfile()
            .map_err(|e| DomainError::extraction(format!("Failed to create temporary file: {}", e)))?;

        tokio::fs::write(image.path(), &file.bytes)
            .await
            .map_err(|e| DomainError::extraction(format!("Failed to write temporary file: {}", e)))?;

        let text = self.ocr.recognize(image.path()).await?;
        debug!(chars = text.len(), "Image recognized");

        Ok(text.trim().to_string())
    }
}
