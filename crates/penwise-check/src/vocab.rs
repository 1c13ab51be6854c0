//! Word lists used by the analysis heuristics.

use once_cell::sync::Lazy;
use regex::Regex;

pub const TRANSITIONS: &[&str] = &[
    "however",
    "therefore",
    "moreover",
    "furthermore",
    "consequently",
    "meanwhile",
    "nevertheless",
    "additionally",
    "similarly",
    "finally",
    "first",
    "second",
    "in addition",
    "for example",
    "for instance",
    "in contrast",
    "on the other hand",
    "as a result",
    "in conclusion",
];

pub const PROFESSIONAL: &[&str] = &[
    "analyze",
    "analyse",
    "demonstrate",
    "implement",
    "evaluate",
    "establish",
    "facilitate",
    "objective",
    "strategy",
    "significant",
    "comprehensive",
    "recommend",
    "ensure",
    "optimize",
    "collaborate",
];

pub const ENGAGING: &[&str] = &[
    "imagine",
    "discover",
    "you",
    "your",
    "amazing",
    "surprising",
    "remarkable",
    "secret",
    "powerful",
    "vivid",
    "exciting",
    "story",
];

pub const FILLERS: &[&str] = &[
    "basically",
    "actually",
    "literally",
    "really",
    "just",
    "very",
    "quite",
    "totally",
    "simply",
    "kind of",
    "sort of",
];

/// Words too common to count as repetition.
pub const STOPWORDS: &[&str] = &[
    "that", "this", "with", "from", "have", "were", "they", "their", "there", "which", "what",
    "when", "will", "would", "been", "into", "than", "then", "them", "some", "also", "about",
    "your", "just", "very", "more",
];

/// Case-insensitive whole-word alternation over a list of words or phrases.
pub fn word_list_regex(words: &[&str]) -> Regex {
    let alternation: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation.join("|")))
        .expect("escaped word list is a valid pattern")
}

pub static TRANSITION_RE: Lazy<Regex> = Lazy::new(|| word_list_regex(TRANSITIONS));
pub static PROFESSIONAL_RE: Lazy<Regex> = Lazy::new(|| word_list_regex(PROFESSIONAL));
pub static ENGAGING_RE: Lazy<Regex> = Lazy::new(|| word_list_regex(ENGAGING));
pub static FILLER_RE: Lazy<Regex> = Lazy::new(|| word_list_regex(FILLERS));

/// Count non-overlapping matches of `re` in `text`.
pub fn count(re: &Regex, text: &str) -> usize {
    re.find_iter(text).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phrases_match_as_whole_words() {
        assert_eq!(count(&TRANSITION_RE, "However, in addition to that."), 2);
        assert_eq!(count(&TRANSITION_RE, "Firstly"), 0);
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(count(&FILLER_RE, "JUST Really basically"), 3);
    }
}
