//! Tone classification by indicator-word counts.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::vocab::{count, word_list_regex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Formal,
    Casual,
    Positive,
    Negative,
    Neutral,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Formal => "formal",
            Self::Casual => "casual",
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dominant tone and the share of indicator hits behind it, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToneReport {
    pub tone: Tone,
    pub confidence: u8,
}

/// Confidence reported when no indicator words are present.
const DEFAULT_CONFIDENCE: u8 = 50;

// Table order breaks ties.
static INDICATORS: Lazy<Vec<(Tone, Regex)>> = Lazy::new(|| {
    vec![
        (
            Tone::Formal,
            word_list_regex(&[
                "therefore",
                "furthermore",
                "moreover",
                "consequently",
                "hereby",
                "pursuant",
                "regarding",
                "accordingly",
                "thus",
                "whereas",
                "shall",
            ]),
        ),
        (
            Tone::Casual,
            word_list_regex(&[
                "hey", "gonna", "wanna", "yeah", "cool", "awesome", "stuff", "kinda", "lol",
                "guys", "ok", "okay",
            ]),
        ),
        (
            Tone::Positive,
            word_list_regex(&[
                "great",
                "excellent",
                "happy",
                "love",
                "wonderful",
                "fantastic",
                "good",
                "success",
                "delighted",
                "pleased",
                "enjoy",
            ]),
        ),
        (
            Tone::Negative,
            word_list_regex(&[
                "bad",
                "terrible",
                "awful",
                "hate",
                "poor",
                "fail",
                "failure",
                "disappointed",
                "unfortunately",
                "problem",
                "worst",
            ]),
        ),
        (
            Tone::Neutral,
            word_list_regex(&[
                "report", "data", "information", "note", "according", "indicates", "shows",
                "describes", "states",
            ]),
        ),
    ]
});

/// Classify the dominant tone of `text`.
pub fn detect_tone(text: &str) -> ToneReport {
    let counts: Vec<(Tone, usize)> = INDICATORS
        .iter()
        .map(|(tone, re)| (*tone, count(re, text)))
        .collect();
    let total: usize = counts.iter().map(|(_, n)| n).sum();

    let mut best = (Tone::Neutral, 0usize);
    for &(tone, n) in &counts {
        if n > best.1 {
            best = (tone, n);
        }
    }

    if total == 0 {
        return ToneReport {
            tone: Tone::Neutral,
            confidence: DEFAULT_CONFIDENCE,
        };
    }
    let confidence = (best.1 as f64 / total as f64 * 100.0).round() as u8;
    ToneReport {
        tone: best.0,
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_indicators_is_neutral_fifty() {
        let report = detect_tone("The cat sat.");
        assert_eq!(report.tone, Tone::Neutral);
        assert_eq!(report.confidence, 50);
        assert_eq!(detect_tone("").confidence, 50);
    }

    #[test]
    fn formal_text() {
        let report = detect_tone("Therefore, the committee shall proceed. Furthermore, it is ok.");
        assert_eq!(report.tone, Tone::Formal);
        assert_eq!(report.confidence, 75);
    }

    #[test]
    fn casual_text() {
        let report = detect_tone("Hey guys, this stuff is gonna be cool.");
        assert_eq!(report.tone, Tone::Casual);
        assert_eq!(report.confidence, 100);
    }

    #[test]
    fn tie_goes_to_earlier_category() {
        // One positive, one negative hit.
        let report = detect_tone("A good plan with a bad ending.");
        assert_eq!(report.tone, Tone::Positive);
        assert_eq!(report.confidence, 50);
    }
}
