//! Processed document entity

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Where the document content came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentSource {
    Pdf,
    Image,
    Text,
}

impl DocumentSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Image => "image",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentSource {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(Self::Pdf),
            "image" => Ok(Self::Image),
            "text" => Ok(Self::Text),
            other => Err(DomainError::storage(format!(
                "Unknown document source '{}'",
                other
            ))),
        }
    }
}

/// A medical term identified in a document, with a plain-language explanation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalTerm {
    pub term: String,
    pub explanation: String,
}

impl MedicalTerm {
    pub fn new(term: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            explanation: explanation.into(),
        }
    }
}

/// Removes blank terms and case-insensitive duplicates, keeping the first occurrence
pub fn dedupe_terms(terms: Vec<MedicalTerm>) -> Vec<MedicalTerm> {
    let mut seen = HashSet::new();

    terms
        .into_iter()
        .map(|t| MedicalTerm::new(t.term.trim(), t.explanation.trim()))
        .filter(|t| !t.term.is_empty())
        .filter(|t| seen.insert(t.term.to_lowercase()))
        .collect()
}

/// Output of content analysis, before it is bound to a stored document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub keywords: Vec<String>,
    pub summary: String,
    pub simplified_content: String,
    pub medical_terms: Vec<MedicalTerm>,
}

/// A processed medical document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub content: String,
    pub source: DocumentSource,
    pub timestamp: DateTime<Utc>,
    pub keywords: Vec<String>,
    pub summary: String,
    pub simplified_content: String,
    pub medical_terms: Vec<MedicalTerm>,
}

impl Document {
    /// Builds a document from extracted content and its analysis
    pub fn new(
        content: impl Into<String>,
        source: DocumentSource,
        timestamp: DateTime<Utc>,
        analysis: Analysis,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            source,
            timestamp,
            keywords: analysis.keywords,
            summary: analysis.summary,
            simplified_content: analysis.simplified_content,
            medical_terms: dedupe_terms(analysis.medical_terms),
        }
    }
}

/// Search hit with its relevance score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub document: Document,
    pub relevance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_source_round_trip_names() {
        for source in [DocumentSource::Pdf, DocumentSource::Image, DocumentSource::Text] {
            assert_eq!(source.as_str().parse::<DocumentSource>().unwrap(), source);
        }
        assert!("audio".parse::<DocumentSource>().is_err());
    }

    #[test]
    fn test_dedupe_terms_is_case_insensitive() {
        let terms = vec![
            MedicalTerm::new("Hypertension", "high blood pressure"),
            MedicalTerm::new("hypertension", "duplicate"),
            MedicalTerm::new("  ", "blank"),
            MedicalTerm::new("Tachycardia", "fast heart rate"),
        ];

        let deduped = dedupe_terms(terms);

        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].explanation, "high blood pressure");
        assert_eq!(deduped[1].term, "Tachycardia");
    }

    #[test]
    fn test_document_serializes_camel_case() {
        let document = Document::new(
            "content",
            DocumentSource::Pdf,
            Utc::now(),
            Analysis {
                simplified_content: "simple".to_string(),
                ..Default::default()
            },
        );

        let json = serde_json::to_value(&document).unwrap();
        assert_eq!(json["simplifiedContent"], "simple");
        assert_eq!(json["source"], "pdf");
        assert!(json["medicalTerms"].as_array().unwrap().is_empty());
    }
}
