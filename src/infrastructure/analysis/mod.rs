//! Content analysis - keywords, summaries and medical terms

mod analyzer;
pub mod text;

pub use analyzer::{ContentAnalyzer, MAX_KEYWORDS, MAX_SUMMARY_SENTENCES};
