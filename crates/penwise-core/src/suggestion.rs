//! Suggestion types shared by the local checker, the AI checker, and the editor.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::settings::ParseSettingError;
use crate::text;

/// Category a suggestion is reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Grammar,
    Spelling,
    Style,
    Readability,
}

impl SuggestionKind {
    pub const ALL: [SuggestionKind; 4] = [
        SuggestionKind::Grammar,
        SuggestionKind::Spelling,
        SuggestionKind::Style,
        SuggestionKind::Readability,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grammar => "grammar",
            Self::Spelling => "spelling",
            Self::Style => "style",
            Self::Readability => "readability",
        }
    }

    /// Grammar and spelling findings count against correctness.
    pub fn is_correctness(&self) -> bool {
        matches!(self, Self::Grammar | Self::Spelling)
    }
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SuggestionKind {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grammar" => Ok(Self::Grammar),
            "spelling" => Ok(Self::Spelling),
            "style" => Ok(Self::Style),
            "readability" => Ok(Self::Readability),
            other => Err(ParseSettingError::new("suggestion kind", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(ParseSettingError::new("severity", other)),
        }
    }
}

/// A proposed edit against a specific text snapshot.
///
/// `start..end` is a half-open char range. At creation time
/// `snapshot[start..end] == original_text`; later edits to the document may
/// break that, which is what the applier's relocation cascade is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    pub kind: SuggestionKind,
    pub start: usize,
    pub end: usize,
    pub original_text: String,
    pub replacement_text: String,
    pub message: String,
    pub severity: Severity,
    /// Local rule that produced this suggestion. `None` for AI suggestions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
}

impl Suggestion {
    /// Whether the recorded span still addresses `original_text` in `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.start < self.end
            && text::char_slice(text, self.start, self.end) == Some(self.original_text.as_str())
    }
}
