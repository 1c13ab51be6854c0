//! Writing analytics: text statistics, readability, and heuristic sub-scores.
//!
//! A report is a pure function of the text and the suggestions found in it.
//! It is recomputed on demand and never stored.
//!
//! # Scores
//!
//! Every sub-score is clamped to `0..=100`; the overall score is their
//! rounded mean.
//!
//! - **Correctness**: `100 - 500 × (grammar + spelling findings) / words`.
//! - **Clarity**: starts at 100; long sentences, very long paragraphs and a
//!   high passive rate cost points; readability above or below 50 moves the
//!   score by up to ten points.
//! - **Engagement**: starts at 60; sentence-length variety, questions,
//!   exclamations and engaging vocabulary add points; filler words cost.
//! - **Delivery**: starts at 60; transitions, professional vocabulary and
//!   substantial opening/closing sentences add points; repeated content
//!   words cost.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use penwise_core::{Suggestion, SuggestionKind};

use crate::checker;
use crate::rules::PASSIVE_PATTERN;
use crate::tone::{ToneReport, detect_tone};
use crate::vocab::{self, ENGAGING_RE, FILLER_RE, PROFESSIONAL_RE, TRANSITION_RE};

const LONG_SENTENCE_WORDS: f64 = 25.0;
const LONG_PARAGRAPH_WORDS: f64 = 150.0;
const PASSIVE_RATE_LIMIT: f64 = 0.3;
const SUBSTANTIAL_SENTENCE_WORDS: usize = 5;
const REPEAT_THRESHOLD: usize = 4;

static SENTENCE_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("valid sentence pattern"));
static PARAGRAPH_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*\n").expect("valid paragraph pattern"));
static PASSIVE: Lazy<Regex> = Lazy::new(|| Regex::new(PASSIVE_PATTERN).expect("valid passive pattern"));

/// Primitive counts over a text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStats {
    pub words: usize,
    pub sentences: usize,
    pub paragraphs: usize,
    pub characters: usize,
    pub characters_no_spaces: usize,
    pub avg_words_per_sentence: f64,
    pub avg_chars_per_word: f64,
    /// Flesch-style reading ease in `0..=100`; higher reads easier.
    pub readability_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scores {
    pub overall: u8,
    pub correctness: u8,
    pub clarity: u8,
    pub engagement: u8,
    pub delivery: u8,
}

impl Scores {
    fn from_parts(correctness: f64, clarity: f64, engagement: f64, delivery: f64) -> Self {
        let parts = [correctness, clarity, engagement, delivery].map(clamp_score);
        let mean = parts.iter().map(|&p| p as f64).sum::<f64>() / parts.len() as f64;
        Self {
            overall: mean.round() as u8,
            correctness: parts[0],
            clarity: parts[1],
            engagement: parts[2],
            delivery: parts[3],
        }
    }

    fn zero() -> Self {
        Self {
            overall: 0,
            correctness: 0,
            clarity: 0,
            engagement: 0,
            delivery: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub stats: TextStats,
    pub scores: Scores,
    pub tone: ToneReport,
    pub suggestion_counts: BTreeMap<SuggestionKind, usize>,
}

impl AnalysisReport {
    pub fn total_suggestions(&self) -> usize {
        self.suggestion_counts.values().sum()
    }
}

fn clamp_score(value: f64) -> u8 {
    value.clamp(0.0, 100.0).round() as u8
}

fn sentences(text: &str) -> Vec<&str> {
    SENTENCE_SPLIT
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn paragraphs(text: &str) -> Vec<&str> {
    PARAGRAPH_SPLIT
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Compute word, sentence and paragraph counts and a readability estimate.
///
/// Empty text yields zero counts and a readability of 100.
pub fn text_stats(text: &str) -> TextStats {
    let words: Vec<&str> = text.split_whitespace().collect();
    let word_count = words.len();
    let sentence_count = sentences(text).len();
    let paragraph_count = paragraphs(text).len();
    let characters = text.chars().count();
    let characters_no_spaces = text.chars().filter(|c| !c.is_whitespace()).count();

    if word_count == 0 {
        return TextStats {
            words: 0,
            sentences: sentence_count,
            paragraphs: paragraph_count,
            characters,
            characters_no_spaces,
            avg_words_per_sentence: 0.0,
            avg_chars_per_word: 0.0,
            readability_score: 100.0,
        };
    }

    let avg_words_per_sentence = word_count as f64 / sentence_count.max(1) as f64;
    let word_chars: usize = words.iter().map(|w| w.chars().count()).sum();
    let avg_chars_per_word = word_chars as f64 / word_count as f64;
    // Syllables per word are approximated as a third of its characters.
    let ease = 206.835 - 1.015 * avg_words_per_sentence - 84.6 * (avg_chars_per_word / 3.0);

    TextStats {
        words: word_count,
        sentences: sentence_count,
        paragraphs: paragraph_count,
        characters,
        characters_no_spaces,
        avg_words_per_sentence: round1(avg_words_per_sentence),
        avg_chars_per_word: round1(avg_chars_per_word),
        readability_score: round1(ease.clamp(0.0, 100.0)),
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Analyse `text`, running the local checker for suggestion counts.
pub fn analyze(text: &str) -> AnalysisReport {
    let suggestions = checker::check(text);
    analyze_with(text, &suggestions)
}

/// Analyse `text` given suggestions already computed for it.
pub fn analyze_with(text: &str, suggestions: &[Suggestion]) -> AnalysisReport {
    let stats = text_stats(text);
    let mut suggestion_counts = BTreeMap::new();
    for s in suggestions {
        *suggestion_counts.entry(s.kind).or_insert(0) += 1;
    }

    let scores = if stats.words == 0 {
        Scores::zero()
    } else {
        let sentence_list = sentences(text);
        Scores::from_parts(
            correctness(&stats, suggestions),
            clarity(text, &stats),
            engagement(text, &stats, &sentence_list),
            delivery(text, &sentence_list),
        )
    };

    AnalysisReport {
        stats,
        scores,
        tone: detect_tone(text),
        suggestion_counts,
    }
}

fn correctness(stats: &TextStats, suggestions: &[Suggestion]) -> f64 {
    let errors = suggestions.iter().filter(|s| s.kind.is_correctness()).count();
    100.0 - 500.0 * errors as f64 / stats.words as f64
}

fn clarity(text: &str, stats: &TextStats) -> f64 {
    let mut score = 100.0;
    if stats.avg_words_per_sentence > LONG_SENTENCE_WORDS {
        score -= ((stats.avg_words_per_sentence - LONG_SENTENCE_WORDS) * 2.0).min(30.0);
    }
    let words_per_paragraph = stats.words as f64 / stats.paragraphs.max(1) as f64;
    if words_per_paragraph > LONG_PARAGRAPH_WORDS {
        score -= 15.0;
    }
    let passive_rate = vocab::count(&PASSIVE, text) as f64 / stats.sentences.max(1) as f64;
    if passive_rate > PASSIVE_RATE_LIMIT {
        score -= 15.0;
    }
    score + (stats.readability_score - 50.0) / 5.0
}

fn engagement(text: &str, stats: &TextStats, sentence_list: &[&str]) -> f64 {
    let mut score = 60.0;

    let lengths: Vec<f64> = sentence_list
        .iter()
        .map(|s| s.split_whitespace().count() as f64)
        .collect();
    let spread = std_dev(&lengths);
    if spread >= 6.0 {
        score += 15.0;
    } else if spread >= 3.0 {
        score += 8.0;
    }

    if text.contains('?') {
        score += 5.0;
    }
    if text.contains('!') {
        score += 5.0;
    }
    score += (vocab::count(&ENGAGING_RE, text) as f64 * 2.0).min(10.0);

    let filler_rate = vocab::count(&FILLER_RE, text) as f64 / stats.words as f64;
    score - (filler_rate * 200.0).min(20.0)
}

fn delivery(text: &str, sentence_list: &[&str]) -> f64 {
    let mut score = 60.0;
    score += (vocab::count(&TRANSITION_RE, text) as f64 * 3.0).min(15.0);
    score += (vocab::count(&PROFESSIONAL_RE, text) as f64 * 2.0).min(10.0);

    let substantial = |s: &&str| s.split_whitespace().count() >= SUBSTANTIAL_SENTENCE_WORDS;
    if sentence_list.first().is_some_and(substantial) {
        score += 5.0;
    }
    if sentence_list.last().is_some_and(substantial) {
        score += 5.0;
    }

    score - (repeated_words(text) as f64 * 3.0).min(15.0)
}

/// Number of distinct content words used at least [`REPEAT_THRESHOLD`] times.
fn repeated_words(text: &str) -> usize {
    let mut freq: HashMap<String, usize> = HashMap::new();
    for word in text.split_whitespace() {
        let word = word
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        if word.chars().count() > 3 && !vocab::STOPWORDS.contains(&word.as_str()) {
            *freq.entry(word).or_insert(0) += 1;
        }
    }
    freq.values().filter(|&&n| n >= REPEAT_THRESHOLD).count()
}

fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
