//! Provider selection heuristics.

use regex::Regex;

use crate::types::ProviderId;

/// Pluggable classification strategy mapping message content to a provider.
///
/// Implementations must be total: every input classifies to some provider.
pub trait Classify: Send + Sync {
    fn classify(&self, text: &str) -> ProviderId;
}

/// Keyword-based classifier over Polish-language conversation content.
///
/// Ordered rules, first match wins; matching is case-insensitive substring
/// matching, a best-effort heuristic rather than a safety guarantee:
/// 1. medical/health/therapy vocabulary -> Anthropic (safety-tuned models)
/// 2. analytical/reasoning/math/code vocabulary -> DeepSeek
/// 3. creative-writing vocabulary -> OpenAI
/// 4. anything else -> DeepSeek (cost-efficient default)
pub struct KeywordClassifier {
    medical: Regex,
    analytical: Regex,
    creative: Regex,
}

impl KeywordClassifier {
    pub fn new() -> Self {
        // Stem-based patterns so inflected forms match
        Self {
            medical: Regex::new(r"(?i)medycyn|lekar|terapi|diagnoz|zdrow").unwrap(),
            analytical: Regex::new(r"(?i)analiz|rozumow|matemat|logik|kod").unwrap(),
            creative: Regex::new(r"(?i)napisz|stw[oó]rz|wymyśl|kreatyw").unwrap(),
        }
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classify for KeywordClassifier {
    fn classify(&self, text: &str) -> ProviderId {
        if self.medical.is_match(text) {
            tracing::debug!("Matched medical vocabulary");
            return ProviderId::Anthropic;
        }
        if self.analytical.is_match(text) {
            tracing::debug!("Matched analytical vocabulary");
            return ProviderId::DeepSeek;
        }
        if self.creative.is_match(text) {
            tracing::debug!("Matched creative vocabulary");
            return ProviderId::OpenAi;
        }
        ProviderId::DeepSeek
    }
}
