//! Keyword, summary and medical term analysis of extracted text

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use super::text::{rank_by_frequency, sentences, tokenize};
use crate::domain::document::dedupe_terms;
use crate::domain::translation::ANONYMOUS_ACTOR;
use crate::domain::{Analysis, MedicalTerm, TranslationRequest, Translator};

/// Most supplementary keywords kept
pub const MAX_KEYWORDS: usize = 10;

/// Most sentences in a summary
pub const MAX_SUMMARY_SENTENCES: usize = 3;

/// Analyzes text, delegating term identification and simplification to a translator
///
/// Translator failures degrade the analysis instead of failing it.
pub struct ContentAnalyzer {
    translator: Arc<dyn Translator>,
}

impl fmt::Debug for ContentAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentAnalyzer").finish_non_exhaustive()
    }
}

impl ContentAnalyzer {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self { translator }
    }

    pub async fn analyze(&self, text: &str) -> Analysis {
        self.analyze_as(text, ANONYMOUS_ACTOR).await
    }

    /// Analyzes `text`, charging the simplification call to `actor`
    #[instrument(skip(self, text), fields(chars = text.len()))]
    pub async fn analyze_as(&self, text: &str, actor: &str) -> Analysis {
        let request = TranslationRequest::simplification(text).with_actor(actor);

        match self.translator.translate(request).await {
            Ok(result) => {
                let terms = dedupe_terms(result.medical_terms.unwrap_or_default());
                debug!(
                    terms = terms.len(),
                    cached = result.cached,
                    "Simplification received"
                );
                build_analysis(text, Some(&result.translated_text), terms)
            }
            Err(e) => {
                warn!(error = %e, "Simplification failed, using basic analysis");
                build_analysis(text, None, Vec::new())
            }
        }
    }
}

fn build_analysis(original: &str, simplified: Option<&str>, terms: Vec<MedicalTerm>) -> Analysis {
    let tokens = match simplified {
        Some(simplified) => tokenize(&format!("{} {}", original, simplified)),
        None => tokenize(original),
    };

    let term_names: HashSet<String> = terms.iter().map(|t| t.term.to_lowercase()).collect();

    let top_terms: Vec<String> = rank_by_frequency(&tokens)
        .into_iter()
        .map(|(token, _)| token)
        .filter(|token| !term_names.contains(token))
        .take(MAX_KEYWORDS)
        .collect();

    let simplified_content = simplified.unwrap_or(original).to_string();
    let summary = summarize(&simplified_content, &terms, &top_terms);

    let mut seen = HashSet::new();
    let keywords = terms
        .iter()
        .map(|t| t.term.clone())
        .chain(top_terms)
        .filter(|k| seen.insert(k.to_lowercase()))
        .collect();

    Analysis {
        keywords,
        summary,
        simplified_content,
        medical_terms: terms,
    }
}

fn summarize(text: &str, terms: &[MedicalTerm], top_terms: &[String]) -> String {
    let lowered_terms: Vec<String> = terms.iter().map(|t| t.term.to_lowercase()).collect();

    sentences(text)
        .into_iter()
        .filter(|sentence| {
            let lower = sentence.to_lowercase();
            lowered_terms.iter().any(|t| lower.contains(t.as_str()))
                || top_terms.iter().any(|k| lower.contains(k.as_str()))
        })
        .take(MAX_SUMMARY_SENTENCES)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::translation::{MEDICAL_LANGUAGE, MockTranslator, SIMPLE_LANGUAGE};

    fn analyzer(translator: MockTranslator) -> (ContentAnalyzer, Arc<MockTranslator>) {
        let translator = Arc::new(translator);
        (ContentAnalyzer::new(translator.clone()), translator)
    }

    #[tokio::test]
    async fn test_degraded_analysis_when_translation_fails() {
        let (analyzer, _) = analyzer(MockTranslator::new().with_error("all providers down"));
        let text = "Hypertension noted. Patient reports mild headache.";

        let analysis = analyzer.analyze(text).await;

        assert_eq!(analysis.simplified_content, text);
        assert!(analysis.medical_terms.is_empty());
        for keyword in ["hypertension", "reports", "mild", "headache"] {
            assert!(
                analysis.keywords.iter().any(|k| k == keyword),
                "missing keyword {}",
                keyword
            );
        }
        assert!(!analysis.keywords.iter().any(|k| k == "patient"));
        assert_eq!(analysis.summary, text);
    }

    #[tokio::test]
    async fn test_keywords_skip_stopwords() {
        let (analyzer, _) = analyzer(MockTranslator::new().with_error("down"));

        let analysis = analyzer.analyze("the patient has a cough and fever").await;

        assert_eq!(analysis.keywords, vec!["cough", "fever"]);
    }

    #[tokio::test]
    async fn test_sends_medical_to_simple_request() {
        let (analyzer, translator) =
            analyzer(MockTranslator::new().with_simplification("Simple.", vec![]));

        analyzer.analyze_as("Dyspnea on exertion.", "user-9").await;

        let requests = translator.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].source_language, MEDICAL_LANGUAGE);
        assert_eq!(requests[0].target_language, SIMPLE_LANGUAGE);
        assert_eq!(requests[0].text, "Dyspnea on exertion.");
        assert_eq!(requests[0].actor, "user-9");
    }

    #[tokio::test]
    async fn test_medical_terms_lead_keywords_and_are_not_repeated() {
        let (analyzer, _) = analyzer(MockTranslator::new().with_simplification(
            "You have high blood pressure, also called hypertension. Your head hurts a little.",
            vec![
                MedicalTerm::new("Hypertension", "high blood pressure"),
                MedicalTerm::new("hypertension", "duplicate"),
            ],
        ));

        let analysis = analyzer
            .analyze("Hypertension noted. Patient reports mild headache.")
            .await;

        assert_eq!(analysis.medical_terms.len(), 1);
        assert_eq!(analysis.keywords[0], "Hypertension");
        assert_eq!(
            analysis
                .keywords
                .iter()
                .filter(|k| k.eq_ignore_ascii_case("hypertension"))
                .count(),
            1
        );
        assert!(analysis.keywords.len() <= 1 + MAX_KEYWORDS);
        assert!(analysis.simplified_content.starts_with("You have high blood pressure"));
        assert!(analysis.summary.contains("hypertension"));
    }

    #[tokio::test]
    async fn test_summary_has_at_most_three_sentences() {
        let simplified = "Fever is present. Fever went down. Fever came back. Fever again. Fever stays.";
        let (analyzer, _) = analyzer(
            MockTranslator::new()
                .with_simplification(simplified, vec![MedicalTerm::new("fever", "high temperature")]),
        );

        let analysis = analyzer.analyze("Pyrexia recurring.").await;

        assert_eq!(
            analysis.summary,
            "Fever is present. Fever went down. Fever came back."
        );
    }

    #[tokio::test]
    async fn test_keywords_capped() {
        let text = "alpha beta gamma delta epsilon zeta theta iota kappa lambda omicron sigma.";
        let (analyzer, _) = analyzer(MockTranslator::new().with_error("down"));

        let analysis = analyzer.analyze(text).await;

        assert_eq!(analysis.keywords.len(), MAX_KEYWORDS);
        assert_eq!(analysis.keywords[0], "alpha");
    }
}
