use std::fmt::Debug;

use crate::domain::DomainError;

/// Decodes a PDF into the text of each page, in page order
///
/// Implementations are synchronous; callers run them off the async runtime.
pub trait PdfTextDecoder: Send + Sync + Debug {
    fn page_texts(&self, bytes: &[u8]) -> Result<Vec<String>, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;

    /// Decoder returning fixed page texts regardless of input
    #[derive(Debug, Default)]
    pub struct FixedPdfDecoder {
        pages: Vec<String>,
        error: Option<String>,
    }

    impl FixedPdfDecoder {
        pub fn with_pages(pages: &[&str]) -> Self {
            Self {
                pages: pages.iter().map(|p| p.to_string()).collect(),
                error: None,
            }
        }

        pub fn failing(error: impl Into<String>) -> Self {
            Self {
                pages: Vec::new(),
                error: Some(error.into()),
            }
        }
    }

    impl PdfTextDecoder for FixedPdfDecoder {
        fn page_texts(&self, _bytes: &[u8]) -> Result<Vec<String>, DomainError> {
            match self.error {
                Some(ref error) => Err(DomainError::extraction(error.clone())),
                None => Ok(self.pages.clone()),
            }
        }
    }
}
