//! PDF text decoding with lopdf

use crate::domain::{DomainError, PdfTextDecoder};

/// Pure Rust PDF decoder
#[derive(Debug, Clone, Default)]
pub struct LopdfDecoder;

impl LopdfDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl PdfTextDecoder for LopdfDecoder {
    fn page_texts(&self, bytes: &[u8]) -> Result<Vec<String>, DomainError> {
        let document = lopdf::Document::load_mem(bytes)
            .map_err(|e| DomainError::extraction(format!("Failed to read PDF: {}", e)))?;

        document
            .get_pages()
            .keys()
            .map(|&page| {
                document.extract_text(&[page]).map_err(|e| {
                    DomainError::extraction(format!("Failed to read page {}: {}", page, e))
                })
            })
            .collect()
    }
}
