use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::domain::document::DocumentSource;

/// An uploaded file awaiting text extraction
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub mime_type: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn new(mime_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: None,
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Builds an upload whose MIME type is guessed from the file name when not declared
    pub fn from_named(
        file_name: impl Into<String>,
        declared_mime: Option<&str>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        let file_name = file_name.into();
        let mime_type = match declared_mime.map(str::trim) {
            Some(mime) if !mime.is_empty() && mime != "application/octet-stream" => {
                mime.to_string()
            }
            _ => mime_guess::from_path(&file_name)
                .first_raw()
                .unwrap_or("application/octet-stream")
                .to_string(),
        };

        Self {
            file_name: Some(file_name),
            mime_type,
            bytes: bytes.into(),
        }
    }

    /// MIME type without parameters, lowercased
    pub fn essence(&self) -> String {
        self.mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }

    /// Extension used for the temporary OCR input file
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .as_deref()
            .and_then(|name| std::path::Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }
}

/// Raw text pulled out of an upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedText {
    pub text: String,
    pub source: DocumentSource,
}

impl ExtractedText {
    pub fn new(text: impl Into<String>, source: DocumentSource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }
}
