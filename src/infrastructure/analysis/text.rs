//! Tokenizing, term ranking and sentence splitting

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

/// Characters dropped before splitting into words
static PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.,/#!$%^&*;:{}=\-_`~()]").unwrap());

static SENTENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.!?]+[.!?]+").unwrap());

/// English fillers plus words every medical report is full of
pub const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "were", "will", "with", "patient", "treatment",
    "medication", "dose", "mg", "tablets", "daily", "prescribed", "doctor", "hospital", "medical",
    "health",
];

static STOPWORD_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| STOPWORDS.iter().copied().collect());

/// Shortest token kept
const MIN_TOKEN_CHARS: usize = 3;

/// Lowercased words of `text` without punctuation, short words or stopwords
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let stripped = PUNCTUATION.replace_all(&lowered, "");

    stripped
        .split_whitespace()
        .filter(|word| word.chars().count() >= MIN_TOKEN_CHARS)
        .filter(|word| !STOPWORD_SET.contains(*word))
        .map(str::to_string)
        .collect()
}

/// Distinct tokens ranked by count, most frequent first
///
/// Equal counts keep the order in which tokens first appeared.
pub fn rank_by_frequency(tokens: &[String]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for token in tokens {
        let count = counts.entry(token.as_str()).or_insert(0);
        if *count == 0 {
            order.push(token.as_str());
        }
        *count += 1;
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|token| (token.to_string(), counts[token]))
        .collect();

    // Stable, so ties stay in first-occurrence order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// Sentences ending in `.`, `!` or `?`, trimmed, in order
///
/// Trailing text without terminal punctuation is not a sentence.
pub fn sentences(text: &str) -> Vec<&str> {
    SENTENCE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .collect()
}
