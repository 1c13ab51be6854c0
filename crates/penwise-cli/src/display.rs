//! Terminal rendering for suggestions, analysis reports, and document lists.

use penwise_check::AnalysisReport;
use penwise_core::{Document, Suggestion, SuggestionKind};

const PREVIEW_CHARS: usize = 60;

/// 1-based line and column of a char offset.
pub fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for c in text.chars().take(offset) {
        if c == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// One line per suggestion: `line:col  kind/severity  "original" -> "replacement"  message`.
pub fn format_suggestion(text: &str, s: &Suggestion) -> String {
    let (line, col) = line_col(text, s.start);
    let mut out = format!(
        "{line:>4}:{col:<3} {:<18} \"{}\" -> \"{}\"  {}",
        format!("{}/{}", s.kind, s.severity),
        s.original_text,
        s.replacement_text,
        s.message
    );
    if let Some(rule) = &s.rule {
        out.push_str(&format!(" [{rule}]"));
    }
    out
}

pub fn print_suggestions(text: &str, suggestions: &[Suggestion]) {
    if suggestions.is_empty() {
        println!("No suggestions.");
        return;
    }
    for s in suggestions {
        println!("{}", format_suggestion(text, s));
    }
    println!();
    println!("{} suggestion(s)", suggestions.len());
}

pub fn report_lines(report: &AnalysisReport) -> Vec<String> {
    let stats = &report.stats;
    let scores = &report.scores;
    let mut lines = vec![
        "Scores".to_string(),
        format!("  {:<26} {}", "overall", scores.overall),
        format!("  {:<26} {}", "correctness", scores.correctness),
        format!("  {:<26} {}", "clarity", scores.clarity),
        format!("  {:<26} {}", "engagement", scores.engagement),
        format!("  {:<26} {}", "delivery", scores.delivery),
        String::new(),
        "Statistics".to_string(),
        format!("  {:<26} {}", "words", stats.words),
        format!("  {:<26} {}", "sentences", stats.sentences),
        format!("  {:<26} {}", "paragraphs", stats.paragraphs),
        format!("  {:<26} {}", "characters", stats.characters),
        format!("  {:<26} {}", "characters (no spaces)", stats.characters_no_spaces),
        format!("  {:<26} {:.1}", "avg words / sentence", stats.avg_words_per_sentence),
        format!("  {:<26} {:.1}", "avg chars / word", stats.avg_chars_per_word),
        format!("  {:<26} {:.1}", "readability", stats.readability_score),
        String::new(),
        "Tone".to_string(),
        format!(
            "  {:<26} {} ({}%)",
            "dominant", report.tone.tone, report.tone.confidence
        ),
        String::new(),
        "Suggestions".to_string(),
    ];
    for kind in SuggestionKind::ALL {
        let n = report.suggestion_counts.get(&kind).copied().unwrap_or(0);
        lines.push(format!("  {:<26} {}", kind.as_str(), n));
    }
    lines
}

pub fn print_report(report: &AnalysisReport) {
    for line in report_lines(report) {
        println!("{line}");
    }
}

fn preview(content: &str) -> String {
    let flat: String = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= PREVIEW_CHARS {
        flat
    } else {
        let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}…")
    }
}

pub fn print_document_list(docs: &[Document]) {
    if docs.is_empty() {
        println!("No documents.");
        return;
    }
    for doc in docs {
        println!(
            "{}  {}  {}",
            doc.id,
            doc.updated_at.format("%Y-%m-%d %H:%M"),
            doc.title
        );
        let p = preview(&doc.content);
        if !p.is_empty() {
            println!("    {p}");
        }
    }
}

pub fn print_document(doc: &Document) {
    println!("=== {} ===", doc.title);
    println!("  {:<10} {}", "id", doc.id);
    println!("  {:<10} {}", "owner", doc.owner_id);
    println!("  {:<10} {}", "created", doc.created_at.to_rfc3339());
    println!("  {:<10} {}", "updated", doc.updated_at.to_rfc3339());
    println!();
    println!("{}", doc.content);
}

#[cfg(test)]
mod tests {
    use penwise_core::Severity;

    use super::*;

    #[test]
    fn line_col_counts_chars() {
        let text = "ab\nçd teh";
        assert_eq!(line_col(text, 0), (1, 1));
        assert_eq!(line_col(text, 3), (2, 1));
        assert_eq!(line_col(text, 6), (2, 4));
    }

    #[test]
    fn suggestion_line() {
        let s = Suggestion {
            id: "local-x-0".into(),
            kind: SuggestionKind::Spelling,
            start: 0,
            end: 3,
            original_text: "teh".into(),
            replacement_text: "the".into(),
            message: "Misspelling.".into(),
            severity: Severity::High,
            rule: Some("misspelling-teh".into()),
        };
        let line = format_suggestion("teh cat", &s);
        assert!(line.contains("spelling/high"));
        assert!(line.contains("\"teh\" -> \"the\""));
        assert!(line.ends_with("[misspelling-teh]"));
    }

    #[test]
    fn preview_truncates() {
        assert_eq!(preview("a\n\nb"), "a b");
        let long = "word ".repeat(30);
        assert_eq!(preview(&long).chars().count(), PREVIEW_CHARS + 1);
    }

    #[test]
    fn report_lists_every_kind() {
        let report = penwise_check::analyze("teh cat sat.");
        let lines = report_lines(&report);
        assert!(lines.iter().any(|l| l.trim_start().starts_with("spelling") && l.ends_with('1')));
        assert!(lines.iter().any(|l| l.trim_start().starts_with("readability")));
    }
}
