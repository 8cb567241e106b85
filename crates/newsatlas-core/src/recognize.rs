use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gazetteer::GazetteerIndex;

#[derive(Debug, Error)]
pub enum RecognizeError {
    #[error("Recognition failed: {0}")]
    Failed(String),
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),
}

pub type RecognizeResult<T> = Result<T, RecognizeError>;

/// Coarse tag for a recognized span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanLabel {
    /// Country or other geo-political entity.
    Geopolitical,
    /// Nationality, religious, or political group.
    Group,
    /// Any other named mention.
    Other,
}

impl SpanLabel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Geopolitical => "geopolitical",
            Self::Group => "group",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for SpanLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An extracted mention: surface text plus its coarse tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub text: String,
    pub label: SpanLabel,
}

impl EntitySpan {
    #[must_use]
    pub fn new(text: impl Into<String>, label: SpanLabel) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

/// Named-entity recognition contract.
///
/// Implementations must be deterministic for a fixed configuration, return
/// spans in order of first occurrence, perform no deduplication, and yield
/// an empty vector (not an error) for empty or whitespace-only input.
pub trait Recognizer: Send + Sync {
    fn recognize(&self, text: &str) -> RecognizeResult<Vec<EntitySpan>>;
}

// Group lexicon and demonym suffixes for the bundled heuristic recognizer.
// Deliberately small: high-precision surface signals, no large word lists.
const GROUP_TERMS: &[&str] = &[
    "american",
    "british",
    "english",
    "scottish",
    "welsh",
    "irish",
    "french",
    "german",
    "russian",
    "ukrainian",
    "chinese",
    "japanese",
    "korean",
    "indian",
    "pakistani",
    "israeli",
    "palestinian",
    "iranian",
    "iraqi",
    "syrian",
    "kurdish",
    "turkish",
    "african",
    "asian",
    "european",
    "muslim",
    "islamic",
    "islamist",
    "christian",
    "catholic",
    "protestant",
    "jewish",
    "hindu",
    "buddhist",
    "sikh",
    "republican",
    "democrat",
    "conservative",
    "labour",
    "tory",
    "tories",
    "communist",
    "socialist",
    "nationalist",
    "taliban",
];

const DEMONYM_SUFFIXES: &[&str] = &["ish", "ese", "ian", "ians"];

// Capitalized sentence-position words that are never entity mentions.
const SKIP_WORDS: &[&str] = &[
    "The", "A", "An", "In", "On", "At", "Of", "For", "And", "But", "Or", "As", "It", "He", "She",
    "We", "They", "I", "You", "His", "Her", "Its", "Their", "Our", "This", "That", "These",
    "Those", "After", "Before", "When", "While", "How", "Why", "What", "Who", "New", "Mr", "Mrs",
    "Ms", "Dr", "Sir",
];

/// Bundled heuristic recognizer.
///
/// The production recognizer is an external model behind the [`Recognizer`]
/// trait; this implementation stands in for it with gazetteer lexicons and
/// capitalization signals so the pipeline runs deterministically without a
/// model runtime. Capitalized token runs are matched longest-first (up to
/// three tokens) against the geographic lexicon; demonym suffixes and a
/// small group lexicon tag identity mentions; remaining capitalized tokens
/// surface as [`SpanLabel::Other`].
pub struct LexiconRecognizer {
    geo_terms: HashSet<String>,
    group_terms: HashSet<String>,
    token_re: regex::Regex,
}

impl LexiconRecognizer {
    /// Build the lexicons from a constructed gazetteer.
    #[must_use]
    pub fn new(gazetteer: &GazetteerIndex) -> Self {
        let mut geo_terms: HashSet<String> = gazetteer
            .countries()
            .iter()
            .map(|record| record.name.to_lowercase())
            .collect();
        geo_terms.extend(gazetteer.alias_terms().map(str::to_string));
        geo_terms.extend(
            gazetteer
                .cities()
                .iter()
                .map(|record| record.name.to_lowercase()),
        );
        // The bare token is resolved (or rejected) downstream by the
        // gazetteer's literal-case rule; the recognizer still surfaces it.
        geo_terms.insert("us".to_string());

        let group_terms = GROUP_TERMS.iter().map(|term| (*term).to_string()).collect();

        // Words, keeping internal apostrophes, periods, and hyphens.
        let token_re = regex::Regex::new(r"\p{L}[\p{L}'’.\-]*")
            .unwrap_or_else(|_| unreachable!("token pattern is valid"));

        Self {
            geo_terms,
            group_terms,
            token_re,
        }
    }

    fn is_group_term(&self, token: &str) -> bool {
        let lower = token.to_lowercase();
        if self.group_terms.contains(&lower) {
            return true;
        }
        if let Some(stripped) = lower.strip_suffix('s') {
            if self.group_terms.contains(stripped) {
                return true;
            }
        }
        DEMONYM_SUFFIXES
            .iter()
            .any(|suffix| lower.len() > suffix.len() + 2 && lower.ends_with(suffix))
    }
}

fn is_capitalized(token: &str) -> bool {
    token.chars().next().is_some_and(char::is_uppercase)
}

impl Recognizer for LexiconRecognizer {
    fn recognize(&self, text: &str) -> RecognizeResult<Vec<EntitySpan>> {
        let mut spans = Vec::new();
        if text.trim().is_empty() {
            return Ok(spans);
        }

        // Trailing periods are sentence punctuation, not part of the token.
        let tokens: Vec<&str> = self
            .token_re
            .find_iter(text)
            .map(|m| m.as_str().trim_end_matches('.'))
            .filter(|token| !token.is_empty())
            .collect();

        let mut i = 0;
        while i < tokens.len() {
            if !is_capitalized(tokens[i]) {
                i += 1;
                continue;
            }

            // Longest window first so "New York" beats "York".
            let mut window = 0;
            for width in (1..=3.min(tokens.len() - i)).rev() {
                let run = &tokens[i..i + width];
                if !run.iter().all(|token| is_capitalized(token)) {
                    continue;
                }
                let phrase = run.join(" ");
                if self.geo_terms.contains(&phrase.to_lowercase()) {
                    spans.push(EntitySpan::new(phrase, SpanLabel::Geopolitical));
                    window = width;
                    break;
                }
            }
            if window > 0 {
                i += window;
                continue;
            }

            let token = tokens[i];
            if SKIP_WORDS.contains(&token) {
                i += 1;
                continue;
            }

            if self.is_group_term(token) {
                spans.push(EntitySpan::new(token, SpanLabel::Group));
            } else {
                spans.push(EntitySpan::new(token, SpanLabel::Other));
            }
            i += 1;
        }

        Ok(spans)
    }
}
