//! The built-in rule table.
//!
//! Rules are declarative records: a pattern, a replacement template with
//! `$1`-style capture references, a category, and a severity. The checker is
//! the only evaluator. Order matters: when two rules match the exact same
//! span, the earlier rule wins.
//!
//! Replacements that are bracket-wrapped (`[...]`) are advisory. They are
//! shown to the writer but never applied.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use penwise_core::{Severity, SuggestionKind};

/// Passive construction: a form of "to be" followed by a past participle.
pub const PASSIVE_PATTERN: &str = r"(?i)\b(?:am|is|are|was|were|be|been|being) (?:\w+ed|written|taken|given|made|done|seen|known|shown|built|sent|told|found|held|kept)\b";

/// A sentence of more than thirty words.
const LONG_SENTENCE_PATTERN: &str = r"(?:[^\s.!?]+[ \t]+){30,}[^\s.!?]+[.!?]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleCategory {
    Grammar,
    Spelling,
    Style,
    Readability,
    Punctuation,
}

impl RuleCategory {
    /// Suggestion kind reported for matches. Punctuation surfaces as grammar.
    pub fn kind(&self) -> SuggestionKind {
        match self {
            Self::Grammar | Self::Punctuation => SuggestionKind::Grammar,
            Self::Spelling => SuggestionKind::Spelling,
            Self::Style => SuggestionKind::Style,
            Self::Readability => SuggestionKind::Readability,
        }
    }
}

/// A compiled rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: String,
    pub pattern: Regex,
    /// Template expanded with the match's capture groups.
    pub replacement: String,
    pub category: RuleCategory,
    pub severity: Severity,
    pub message: String,
    /// Non-global rules report only their first match.
    pub global: bool,
}

impl Rule {
    pub fn new(
        id: impl Into<String>,
        pattern: &str,
        replacement: impl Into<String>,
        category: RuleCategory,
        severity: Severity,
        message: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            id: id.into(),
            pattern: Regex::new(pattern)?,
            replacement: replacement.into(),
            category,
            severity,
            message: message.into(),
            global: true,
        })
    }

    pub fn first_match_only(mut self) -> Self {
        self.global = false;
        self
    }

    /// Expand the replacement template for one match.
    ///
    /// A capitalised match keeps its capital when the template starts lowercase.
    pub fn render(&self, caps: &Captures<'_>) -> String {
        let mut out = String::new();
        caps.expand(&self.replacement, &mut out);
        let matched = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
        preserve_initial_case(matched, &out)
    }
}

fn preserve_initial_case(matched: &str, replacement: &str) -> String {
    let starts_upper = matched.chars().next().is_some_and(char::is_uppercase);
    let mut chars = replacement.chars();
    match chars.next() {
        Some(first) if starts_upper && first.is_lowercase() => {
            first.to_uppercase().chain(chars).collect()
        }
        _ => replacement.to_string(),
    }
}

// ── Rule data ──

struct RuleDef {
    id: &'static str,
    pattern: &'static str,
    replacement: &'static str,
    category: RuleCategory,
    severity: Severity,
    message: &'static str,
}

const fn def(
    id: &'static str,
    pattern: &'static str,
    replacement: &'static str,
    category: RuleCategory,
    severity: Severity,
    message: &'static str,
) -> RuleDef {
    RuleDef {
        id,
        pattern,
        replacement,
        category,
        severity,
        message,
    }
}

use RuleCategory::{Grammar, Punctuation, Readability, Style};
use Severity::{High, Low, Medium};

/// Common misspellings: (wrong, right).
const MISSPELLINGS: &[(&str, &str)] = &[
    ("teh", "the"),
    ("recieve", "receive"),
    ("recieved", "received"),
    ("seperate", "separate"),
    ("definately", "definitely"),
    ("occured", "occurred"),
    ("occurence", "occurrence"),
    ("untill", "until"),
    ("wich", "which"),
    ("accomodate", "accommodate"),
    ("acheive", "achieve"),
    ("beleive", "believe"),
    ("goverment", "government"),
    ("enviroment", "environment"),
    ("existance", "existence"),
    ("neccessary", "necessary"),
    ("publically", "publicly"),
    ("tommorow", "tomorrow"),
    ("truely", "truly"),
    ("wierd", "weird"),
    ("alot", "a lot"),
    ("thier", "their"),
    ("becuase", "because"),
    ("freind", "friend"),
    ("arguement", "argument"),
    ("calender", "calendar"),
    ("embarass", "embarrass"),
    ("occassion", "occasion"),
    ("persue", "pursue"),
    ("wether", "whether"),
];

const GRAMMAR: &[RuleDef] = &[
    def(
        "modal-of",
        r"(?i)\b(could|would|should|must|might) of\b",
        "$1 have",
        Grammar,
        High,
        "Use \"have\" after a modal verb, not \"of\".",
    ),
    def(
        "article-a-vowel",
        r"\ba ([aeio][a-z]+)\b",
        "an $1",
        Grammar,
        Medium,
        "Use \"an\" before a word starting with a vowel sound.",
    ),
    def(
        "article-an-consonant",
        r"\ban ([bcdfgjklmnpqrstvwxz][a-z]*)\b",
        "a $1",
        Grammar,
        Medium,
        "Use \"a\" before a word starting with a consonant sound.",
    ),
    def(
        "third-person-dont",
        r"(?i)\b(he|she|it) don't\b",
        "$1 doesn't",
        Grammar,
        High,
        "Third-person singular subjects take \"doesn't\".",
    ),
    def(
        "plural-was",
        r"(?i)\b(you|we|they) was\b",
        "$1 were",
        Grammar,
        High,
        "Plural subjects take \"were\".",
    ),
    def(
        "plural-is",
        r"(?i)\b(you|we|they) is\b",
        "$1 are",
        Grammar,
        High,
        "Plural subjects take \"are\".",
    ),
    def(
        "singular-were",
        r"(?i)\b(he|she|it) were\b",
        "$1 was",
        Grammar,
        Medium,
        "Singular subjects usually take \"was\".",
    ),
    def(
        "lowercase-i",
        r"\bi (am|was|have|had|think|will|would|can|do|did|know|want|feel)\b",
        "I $1",
        Grammar,
        Medium,
        "The pronoun \"I\" is always capitalised.",
    ),
    def(
        "comparative-then",
        r"(?i)\b(more|less|better|worse|rather|greater|smaller|larger) then\b",
        "$1 than",
        Grammar,
        High,
        "Use \"than\" for comparisons.",
    ),
    def(
        "its-contraction",
        r"(?i)\bits (a|an|the|not|been|going)\b",
        "it's $1",
        Grammar,
        Medium,
        "Use \"it's\" (it is) here, not the possessive \"its\".",
    ),
    def(
        "your-welcome",
        r"(?i)\byour welcome\b",
        "you're welcome",
        Grammar,
        Medium,
        "Use \"you're\" (you are) here.",
    ),
    def(
        "have-went",
        r"(?i)\b(have|has|had) went\b",
        "$1 gone",
        Grammar,
        High,
        "The past participle of \"go\" is \"gone\".",
    ),
    def(
        "less-countable",
        r"(?i)\bless (people|things|items|words|mistakes|errors|cars|books|students)\b",
        "fewer $1",
        Grammar,
        Low,
        "Use \"fewer\" with countable nouns.",
    ),
    def(
        "suppose-to",
        r"(?i)\bsuppose to\b",
        "supposed to",
        Grammar,
        Medium,
        "The idiom is \"supposed to\".",
    ),
    def(
        "could-care-less",
        r"(?i)\bcould care less\b",
        "couldn't care less",
        Grammar,
        Low,
        "The idiom is \"couldn't care less\".",
    ),
    def(
        "intensive-purposes",
        r"(?i)\bfor all intensive purposes\b",
        "for all intents and purposes",
        Grammar,
        Medium,
        "The idiom is \"for all intents and purposes\".",
    ),
    def(
        "reason-is-because",
        r"(?i)\bthe reason is because\b",
        "the reason is that",
        Grammar,
        Low,
        "\"The reason is because\" is redundant.",
    ),
    def(
        "irregardless",
        r"(?i)\birregardless\b",
        "regardless",
        Grammar,
        Medium,
        "\"Irregardless\" is nonstandard.",
    ),
];

const PUNCTUATION: &[RuleDef] = &[
    def(
        "space-before-punctuation",
        r"[ \t]+([,.;:!?])",
        "$1",
        Punctuation,
        Low,
        "Remove the space before punctuation.",
    ),
    def(
        "space-after-comma",
        r"([,;:])([A-Za-z])",
        "$1 $2",
        Punctuation,
        Low,
        "Add a space after punctuation.",
    ),
    def(
        "repeated-exclamation",
        r"!{2,}",
        "!",
        Punctuation,
        Low,
        "One exclamation mark is enough.",
    ),
    def(
        "repeated-question",
        r"\?{2,}",
        "?",
        Punctuation,
        Low,
        "One question mark is enough.",
    ),
    def(
        "repeated-comma",
        r",{2,}",
        ",",
        Punctuation,
        Medium,
        "Remove the extra comma.",
    ),
    def(
        "double-space",
        r" {2,}",
        " ",
        Punctuation,
        Low,
        "Use a single space between words.",
    ),
];

/// Words commonly typed twice in a row.
const REPEATABLE_WORDS: &[&str] = &[
    "the", "a", "an", "and", "is", "to", "of", "in", "it", "that", "for", "was", "on", "with",
];

/// Wordy phrases and their concise forms.
const WORDY_PHRASES: &[(&str, &str)] = &[
    ("in order to", "to"),
    ("due to the fact that", "because"),
    ("at this point in time", "now"),
    ("in spite of the fact that", "although"),
    ("has the ability to", "can"),
    ("a large number of", "many"),
    ("in the event that", "if"),
    ("for the purpose of", "to"),
    ("with regard to", "about"),
    ("in the near future", "soon"),
    ("at the present time", "currently"),
];

/// Weak intensifier + adjective pairs and stronger single words.
///
/// Every phrase starts with a consonant sound and so must every replacement,
/// or a preceding "a" would need to become "an".
const WEAK_INTENSIFIERS: &[(&str, &str)] = &[
    ("very good", "great"),
    ("very bad", "terrible"),
    ("very big", "huge"),
    ("very small", "tiny"),
    ("very happy", "delighted"),
    ("very sad", "miserable"),
    ("very important", "crucial"),
    ("very tired", "drained"),
    ("really difficult", "gruelling"),
];

const CLICHES: &[(&str, &str)] = &[
    ("at the end of the day", "ultimately"),
    ("think outside the box", "think creatively"),
    ("low-hanging fruit", "easy wins"),
    ("last but not least", "finally"),
    ("each and every", "every"),
];

const ADVISORIES: &[RuleDef] = &[
    def(
        "filler-word",
        r"(?i)\b(?:basically|literally|totally|actually)\b",
        "[omit]",
        Style,
        Low,
        "Filler word; the sentence may read better without it.",
    ),
    def(
        "passive-voice",
        PASSIVE_PATTERN,
        "[rewrite in active voice]",
        Readability,
        Low,
        "Passive voice can make a sentence harder to follow.",
    ),
    def(
        "long-sentence",
        LONG_SENTENCE_PATTERN,
        "[split into shorter sentences]",
        Readability,
        Medium,
        "This sentence is long; splitting it may help readers.",
    ),
];

// ── Table construction ──

fn compile(def: &RuleDef) -> Rule {
    Rule::new(
        def.id,
        def.pattern,
        def.replacement,
        def.category,
        def.severity,
        def.message,
    )
    .expect("built-in rule pattern is valid")
}

fn phrase_rule(
    prefix: &str,
    (phrase, better): (&str, &str),
    category: RuleCategory,
    severity: Severity,
    message: String,
) -> Rule {
    let id = format!("{prefix}-{}", phrase.replace(' ', "-"));
    let pattern = format!(r"(?i)\b{}\b", regex::escape(phrase));
    Rule::new(id, &pattern, better, category, severity, message)
        .expect("escaped phrase pattern is valid")
}

fn build_rules() -> Vec<Rule> {
    let mut rules = Vec::new();

    for &(wrong, right) in MISSPELLINGS {
        rules.push(phrase_rule(
            "spelling",
            (wrong, right),
            RuleCategory::Spelling,
            High,
            format!("Possible spelling mistake: did you mean \"{right}\"?"),
        ));
    }

    rules.extend(GRAMMAR.iter().map(compile));
    rules.extend(PUNCTUATION.iter().map(compile));

    for word in REPEATABLE_WORDS {
        // The whole run collapses, so "the the the" fixes in one step.
        let pattern = format!(r"(?i)\b({word})(?:\s+{word}\b)+");
        let rule = Rule::new(
            format!("repeated-{word}"),
            &pattern,
            "$1",
            Grammar,
            Medium,
            format!("The word \"{word}\" is repeated."),
        )
        .expect("repeated-word pattern is valid");
        rules.push(rule);
    }

    for &pair in WORDY_PHRASES {
        rules.push(phrase_rule(
            "wordy",
            pair,
            Style,
            Low,
            format!("\"{}\" can be shortened to \"{}\".", pair.0, pair.1),
        ));
    }
    for &pair in WEAK_INTENSIFIERS {
        rules.push(phrase_rule(
            "intensifier",
            pair,
            Style,
            Low,
            format!("A stronger word than \"{}\" reads better.", pair.0),
        ));
    }
    for &pair in CLICHES {
        rules.push(phrase_rule(
            "cliche",
            pair,
            Style,
            Low,
            format!("\"{}\" is a cliché.", pair.0),
        ));
    }

    rules.extend(ADVISORIES.iter().map(compile));
    rules
}

static RULES: Lazy<Vec<Rule>> = Lazy::new(build_rules);

/// The built-in rule table, compiled once.
pub fn rules() -> &'static [Rule] {
    &RULES
}
