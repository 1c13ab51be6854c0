//! Local writing checks: regex rule table, suggestion applier, analytics.
//!
//! Everything here is synchronous and deterministic. The AI checker lives in
//! `penwise-ai`; this crate is what runs without a network.

pub mod analysis;
pub mod applier;
pub mod checker;
pub mod rules;
pub mod tone;
mod vocab;

pub use analysis::{AnalysisReport, Scores, TextStats, analyze, analyze_with, text_stats};
pub use applier::{ApplyOutcome, Strategy, apply, apply_detailed, is_advisory};
pub use checker::{check, check_with_rules};
pub use rules::{Rule, RuleCategory};
pub use tone::{Tone, ToneReport, detect_tone};
