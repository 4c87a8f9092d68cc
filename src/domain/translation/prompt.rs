//! Provider instructions and interpretation of generated text

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::TranslationRequest;
use crate::domain::document::{MedicalTerm, dedupe_terms};

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```[a-zA-Z]*\s*(.*?)\s*```$").expect("valid code fence regex"));

/// Builds the system instruction sent alongside the raw text
pub fn system_instruction(request: &TranslationRequest) -> String {
    if request.is_simplification() {
        return concat!(
            "You are a medical translator helping patients understand their reports. ",
            "Rewrite the following medical text in simple, plain language and identify ",
            "the medical terms it contains. Respond only with a JSON object of the form ",
            r#"{"simplified_text": "...", "medical_terms": [{"term": "...", "explanation": "..."}]}"#,
            ". Keep the explanations short."
        )
        .to_string();
    }

    format!(
        "You are a medical translator. Translate the following text from {} to {}. \
         Maintain medical terminology accuracy.",
        request.source_language, request.target_language
    )
}

#[derive(Debug, Deserialize)]
struct SimplificationEnvelope {
    simplified_text: String,
    #[serde(default)]
    medical_terms: Vec<MedicalTerm>,
}

/// Generated text split into the user-facing translation and any identified terms
#[derive(Debug, Clone, PartialEq)]
pub struct Interpretation {
    pub text: String,
    pub medical_terms: Option<Vec<MedicalTerm>>,
}

/// Interprets raw provider output for the given request
///
/// Simplification answers are expected as a JSON envelope; anything else is
/// taken verbatim as the simplified text with no identified terms.
pub fn interpret(request: &TranslationRequest, generated: &str) -> Interpretation {
    if !request.is_simplification() {
        return Interpretation {
            text: generated.to_string(),
            medical_terms: None,
        };
    }

    match parse_envelope(generated) {
        Some(envelope) => Interpretation {
            text: envelope.simplified_text.trim().to_string(),
            medical_terms: Some(dedupe_terms(envelope.medical_terms)),
        },
        None => Interpretation {
            text: generated.trim().to_string(),
            medical_terms: Some(Vec::new()),
        },
    }
}

fn parse_envelope(generated: &str) -> Option<SimplificationEnvelope> {
    let trimmed = generated.trim();
    let unfenced = CODE_FENCE
        .captures(trimmed)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(trimmed);

    let start = unfenced.find('{')?;
    let end = unfenced.rfind('}')?;
    if end < start {
        return None;
    }

    serde_json::from_str(&unfenced[start..=end]).ok()
}
