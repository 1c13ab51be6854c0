//! Prompt construction from writing settings and feedback history.

use penwise_core::{
    AcademicStyle, CheckingMode, FeedbackStats, LanguageVariant, SuggestionKind, WritingMode,
    WritingSettings,
};

use crate::CompletionRequest;

/// Samples needed before a kind's acceptance rate influences the prompt.
const FEEDBACK_MIN_SAMPLES: u32 = 5;
const FEEDBACK_LOW_RATE: f64 = 0.3;
const FEEDBACK_HIGH_RATE: f64 = 0.7;

const PREAMBLE: &str = "\
You are a meticulous writing assistant. Review the user's text for grammar, spelling, \
style and readability problems.

Respond ONLY with a JSON array. No markdown fences, no explanation, just raw JSON:
[
  {
    \"original\": \"the exact text to change, copied from the input\",
    \"suggestion\": \"the replacement text\",
    \"reason\": \"a short explanation for the writer\",
    \"type\": \"grammar\" | \"spelling\" | \"style\" | \"readability\",
    \"severity\": \"low\" | \"medium\" | \"high\",
    \"start_pos\": character offset where \"original\" starts in the input,
    \"end_pos\": character offset just past the end of \"original\"
  }
]

The user message is the text itself; offsets count characters from its first character.
If the text has no problems, respond with [].";

fn language_guidance(variant: LanguageVariant) -> &'static str {
    match variant {
        LanguageVariant::American => {
            "Use American English spelling (color, organize, center, traveled)."
        }
        LanguageVariant::British => {
            "Use British English spelling (colour, organise, centre, travelled)."
        }
        LanguageVariant::Canadian => {
            "Use Canadian English spelling: British forms such as colour and centre, \
             with -ize endings such as organize."
        }
        LanguageVariant::Australian => {
            "Use Australian English spelling (colour, organise, centre, travelled)."
        }
    }
}

fn academic_guidance(style: AcademicStyle) -> Option<&'static str> {
    match style {
        AcademicStyle::None => None,
        AcademicStyle::Mla => Some(
            "Follow MLA conventions: present tense for discussing texts, \
             author-page in-text citations.",
        ),
        AcademicStyle::Apa => Some(
            "Follow APA conventions: past tense for reporting research, \
             author-date citations, avoid contractions.",
        ),
        AcademicStyle::Chicago => Some(
            "Follow Chicago Manual of Style conventions, including the serial comma.",
        ),
        AcademicStyle::Harvard => Some(
            "Follow Harvard referencing conventions with author-date citations.",
        ),
    }
}

fn writing_mode_guidance(mode: WritingMode) -> &'static str {
    match mode {
        WritingMode::Academic => "The text is academic: favour precision, formality and hedged claims.",
        WritingMode::Business => "The text is business writing: favour clarity, brevity and a professional tone.",
        WritingMode::Casual => "The text is casual: keep its conversational voice; flag only real errors and confusing phrasing.",
        WritingMode::Creative => "The text is creative writing: respect deliberate stylistic choices; focus on errors and flow.",
        WritingMode::Technical => "The text is technical: favour exact terminology and unambiguous instructions.",
    }
}

fn checking_mode_guidance(mode: CheckingMode) -> &'static str {
    match mode {
        CheckingMode::Speed => {
            "Report only the most important issues, at most 10 suggestions."
        }
        CheckingMode::Standard => "Report the important issues, at most 25 suggestions.",
        CheckingMode::Comprehensive => {
            "Be thorough: report every grammar, spelling, style and readability issue you find."
        }
    }
}

/// Emphasis derived from how often the writer accepts each kind of suggestion.
pub fn feedback_guidance(feedback: &FeedbackStats) -> Option<String> {
    let mut emphasise = Vec::new();
    let mut de_emphasise = Vec::new();
    for kind in SuggestionKind::ALL {
        let stats = feedback.get(kind);
        if stats.total() < FEEDBACK_MIN_SAMPLES {
            continue;
        }
        match stats.acceptance_rate() {
            Some(rate) if rate < FEEDBACK_LOW_RATE => de_emphasise.push(kind.as_str()),
            Some(rate) if rate > FEEDBACK_HIGH_RATE => emphasise.push(kind.as_str()),
            _ => {}
        }
    }

    let mut lines = Vec::new();
    if !emphasise.is_empty() {
        lines.push(format!(
            "The writer usually accepts {} suggestions; prioritise them.",
            emphasise.join(" and ")
        ));
    }
    if !de_emphasise.is_empty() {
        lines.push(format!(
            "The writer usually rejects {} suggestions; only report clear-cut ones.",
            de_emphasise.join(" and ")
        ));
    }
    (!lines.is_empty()).then(|| lines.join(" "))
}

/// Assemble the system prompt for `settings`.
pub fn system_prompt(settings: &WritingSettings, feedback: Option<&FeedbackStats>) -> String {
    let mut sections = vec![
        PREAMBLE.to_string(),
        language_guidance(settings.language_variant).to_string(),
    ];
    if let Some(academic) = academic_guidance(settings.academic_style) {
        sections.push(academic.to_string());
    }
    sections.push(writing_mode_guidance(settings.writing_mode).to_string());
    sections.push(checking_mode_guidance(settings.checking_mode).to_string());
    if settings.critical_errors_only {
        sections.push(
            "Report only critical errors: high-severity grammar and spelling mistakes. \
             Ignore style and readability."
                .to_string(),
        );
    }
    if let Some(bias) = feedback.and_then(feedback_guidance) {
        sections.push(bias);
    }
    sections.join("\n\n")
}

/// Build the completion request for checking `text`.
///
/// The user message is the literal text so offsets in the reply refer to it.
pub fn build_request(
    text: &str,
    settings: &WritingSettings,
    feedback: Option<&FeedbackStats>,
) -> CompletionRequest {
    CompletionRequest {
        system_prompt: system_prompt(settings, feedback),
        user_prompt: text.to_string(),
        max_tokens: settings.checking_mode.token_budget(),
        temperature: 0.2,
    }
}
