//! Applying a suggestion to text that may have drifted since it was checked.
//!
//! Suggestions are computed against a snapshot; by the time the writer
//! accepts one, the document has often moved on. The applier relocates the
//! target through an ordered chain of strategies and splices the
//! replacement into the first span found. If no strategy finds a span the
//! text is returned untouched: an inapplicable suggestion never edits the
//! document.
//!
//! | Order | Strategy | Finds |
//! |---|---|---|
//! | 1 | exact position | `text[start..end] == original` |
//! | 2 | exact substring | first occurrence of `original` |
//! | 3 | case-insensitive | first occurrence ignoring case |
//! | 4 | trimmed | first occurrence of `original.trim()` |
//! | 5 | fuzzy words | key words of `original` in order |
//! | 6 | word boundary | single token as a whole word |
//! | 7 | whole document | suggestion spanning the whole text |

use std::ops::Range;

use regex::RegexBuilder;
use tracing::{debug, warn};

use penwise_core::Suggestion;
use penwise_core::text;

/// Phrases that mark a replacement as advice rather than an edit.
const HEDGES: &[&str] = &["consider", "try to", "you might"];

/// Minimum size of a suggestion treated as a whole-document rewrite.
const WHOLE_DOC_MIN_CHARS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    ExactPosition,
    ExactSubstring,
    CaseInsensitive,
    Trimmed,
    FuzzyWords,
    WordBoundary,
    WholeDocument,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExactPosition => "exact-position",
            Self::ExactSubstring => "exact-substring",
            Self::CaseInsensitive => "case-insensitive",
            Self::Trimmed => "trimmed",
            Self::FuzzyWords => "fuzzy-words",
            Self::WordBoundary => "word-boundary",
            Self::WholeDocument => "whole-document",
        }
    }
}

/// Result of [`apply_detailed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied { text: String, strategy: Strategy },
    /// The suggestion has no concrete replacement.
    Advisory,
    /// No strategy located the target.
    NotFound,
}

impl ApplyOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Locates the byte span a suggestion should replace.
type Locate = fn(&str, &Suggestion) -> Option<Range<usize>>;

const CASCADE: &[(Strategy, Locate)] = &[
    (Strategy::ExactPosition, exact_position),
    (Strategy::ExactSubstring, exact_substring),
    (Strategy::CaseInsensitive, case_insensitive),
    (Strategy::Trimmed, trimmed),
    (Strategy::FuzzyWords, fuzzy_words),
    (Strategy::WordBoundary, word_boundary),
    (Strategy::WholeDocument, whole_document),
];

/// True when a suggestion carries advice instead of a concrete replacement.
pub fn is_advisory(suggestion: &Suggestion) -> bool {
    if suggestion.replacement_text.is_empty()
        || suggestion.replacement_text == suggestion.original_text
    {
        return true;
    }
    // A whitespace-only replacement is a concrete edit.
    let replacement = suggestion.replacement_text.trim();
    if replacement.is_empty() {
        return false;
    }
    if replacement.starts_with('[') && replacement.ends_with(']') {
        return true;
    }
    let lower = replacement.to_lowercase();
    HEDGES.iter().any(|h| lower.contains(h))
}

/// Apply `suggestion` to `current`, or return `current` unchanged.
pub fn apply(current: &str, suggestion: &Suggestion) -> String {
    match apply_detailed(current, suggestion) {
        ApplyOutcome::Applied { text, .. } => text,
        ApplyOutcome::Advisory | ApplyOutcome::NotFound => current.to_string(),
    }
}

/// Apply `suggestion` to `current`, reporting how the target was found.
pub fn apply_detailed(current: &str, suggestion: &Suggestion) -> ApplyOutcome {
    if is_advisory(suggestion) {
        debug!(id = %suggestion.id, "advisory suggestion, nothing to apply");
        return ApplyOutcome::Advisory;
    }

    for &(strategy, locate) in CASCADE {
        if let Some(range) = locate(current, suggestion) {
            debug!(
                id = %suggestion.id,
                strategy = strategy.as_str(),
                "suggestion applied"
            );
            let text = if strategy == Strategy::WholeDocument {
                suggestion.replacement_text.clone()
            } else {
                text::splice(current, range, &suggestion.replacement_text)
            };
            return ApplyOutcome::Applied { text, strategy };
        }
    }

    warn!(
        id = %suggestion.id,
        original = %suggestion.original_text,
        "could not locate suggestion target; text left unchanged"
    );
    ApplyOutcome::NotFound
}

// ── Strategies ──

fn exact_position(current: &str, s: &Suggestion) -> Option<Range<usize>> {
    if s.start >= s.end {
        return None;
    }
    let range = text::byte_range(current, s.start, s.end)?;
    (current[range.clone()] == *s.original_text).then_some(range)
}

fn exact_substring(current: &str, s: &Suggestion) -> Option<Range<usize>> {
    find_literal(current, &s.original_text)
}

fn case_insensitive(current: &str, s: &Suggestion) -> Option<Range<usize>> {
    if s.original_text.is_empty() {
        return None;
    }
    find_pattern(current, &regex::escape(&s.original_text))
}

fn trimmed(current: &str, s: &Suggestion) -> Option<Range<usize>> {
    let needle = s.original_text.trim();
    if needle.len() == s.original_text.len() {
        // Identical to the exact-substring search.
        return None;
    }
    find_literal(current, needle)
}

fn fuzzy_words(current: &str, s: &Suggestion) -> Option<Range<usize>> {
    let key_words: Vec<String> = s
        .original_text
        .split_whitespace()
        .filter(|w| w.chars().count() > 2)
        .map(regex::escape)
        .collect();
    if key_words.is_empty() {
        return None;
    }
    find_pattern(current, &key_words.join(".*?"))
}

fn word_boundary(current: &str, s: &Suggestion) -> Option<Range<usize>> {
    let token = s.original_text.trim();
    if token.chars().count() <= 2 || token.contains(char::is_whitespace) {
        return None;
    }
    find_pattern(current, &format!(r"\b{}\b", regex::escape(token)))
}

fn whole_document(current: &str, s: &Suggestion) -> Option<Range<usize>> {
    let len = text::char_len(current);
    let slack = (len / 20).max(3);
    let covers_text = s.start == 0
        && s.end.abs_diff(len) <= slack
        && text::char_len(&s.original_text).abs_diff(len) <= slack;
    (covers_text && len >= WHOLE_DOC_MIN_CHARS).then(|| 0..current.len())
}

fn find_literal(haystack: &str, needle: &str) -> Option<Range<usize>> {
    if needle.is_empty() {
        return None;
    }
    haystack
        .find(needle)
        .map(|start| start..start + needle.len())
}

/// Case-insensitive regex search; a pattern that fails to build finds nothing.
fn find_pattern(haystack: &str, pattern: &str) -> Option<Range<usize>> {
    let re = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .ok()?;
    re.find(haystack)
        .filter(|m| !m.is_empty())
        .map(|m| m.range())
}
