//! Turning a free-form model reply into validated suggestions.
//!
//! The model is asked for a bare JSON array but frequently wraps it in prose
//! or code fences, so the parser scans for the first `[...]` that parses as
//! an array of objects. Each entry is validated on its own; a bad entry is
//! dropped without discarding the batch. When no array can be found, a
//! permissive `"X" -> "Y"` line parser recovers what it can.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use penwise_core::text;
use penwise_core::{Severity, Suggestion, SuggestionKind};

static ARROW_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"["“]([^"”\n]+)["”]\s*(?:->|→|=>)\s*["“]([^"”\n]*)["”]"#)
        .expect("valid arrow-line pattern")
});

#[derive(Debug, Deserialize)]
struct RawSuggestion {
    original: Option<String>,
    suggestion: Option<String>,
    reason: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    severity: Option<String>,
    start_pos: Option<f64>,
    end_pos: Option<f64>,
}

/// Parse a model reply into suggestions addressed against `source`.
///
/// Returns an empty list when nothing usable is found.
pub fn parse_suggestions(reply: &str, source: &str) -> Vec<Suggestion> {
    if let Some(entries) = find_json_array(reply) {
        let total = entries.len();
        let suggestions: Vec<Suggestion> = entries
            .into_iter()
            .filter_map(|entry| validate_entry(entry, source))
            .collect();
        debug!(
            total,
            kept = suggestions.len(),
            "parsed JSON suggestion array"
        );
        return suggestions;
    }

    let recovered = parse_arrow_lines(reply, source);
    if recovered.is_empty() {
        warn!(reply_chars = reply.len(), "model reply contained no usable suggestions");
    } else {
        debug!(count = recovered.len(), "recovered suggestions from arrow lines");
    }
    recovered
}

/// Find the first balanced `[...]` span that parses as an array of objects.
///
/// Arrays holding no objects, such as a `[1]` citation in the prose, are
/// skipped. An empty array is accepted.
pub fn find_json_array(reply: &str) -> Option<Vec<Value>> {
    let mut search_from = 0;
    while let Some(offset) = reply[search_from..].find('[') {
        let start = search_from + offset;
        if let Some(end) = matching_bracket(reply, start)
            && let Ok(entries) = serde_json::from_str::<Vec<Value>>(&reply[start..=end])
        {
            if entries.is_empty() || entries.iter().any(Value::is_object) {
                return Some(entries);
            }
            debug!(at = start, "skipping bracketed text that holds no entries");
        }
        search_from = start + 1;
    }
    None
}

/// Byte index of the `]` closing the `[` at `start`, skipping string contents.
fn matching_bracket(s: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in s[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + i);
                }
            }
            _ => {}
        }
    }
    None
}

fn validate_entry(entry: Value, source: &str) -> Option<Suggestion> {
    let raw: RawSuggestion = match serde_json::from_value(entry) {
        Ok(raw) => raw,
        Err(e) => {
            debug!(error = %e, "dropping malformed suggestion entry");
            return None;
        }
    };

    let (Some(original), Some(replacement), Some(start_pos), Some(end_pos)) =
        (raw.original, raw.suggestion, raw.start_pos, raw.end_pos)
    else {
        debug!("dropping suggestion entry with missing fields");
        return None;
    };
    if original.is_empty() {
        return None;
    }

    let (start, end) = match claimed_span(source, &original, start_pos, end_pos) {
        Some(span) => span,
        None => match locate(source, &original) {
            Some(span) => {
                debug!(original = %original, start = span.0, "repositioned AI suggestion");
                span
            }
            None => {
                debug!(original = %original, "dropping AI suggestion not found in text");
                return None;
            }
        },
    };

    Some(Suggestion {
        id: format!("ai-{}", Uuid::new_v4()),
        kind: parse_kind(raw.kind.as_deref()),
        start,
        end,
        original_text: original,
        replacement_text: replacement,
        message: raw
            .reason
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| "Suggested improvement.".to_string()),
        severity: raw
            .severity
            .and_then(|s| s.parse().ok())
            .unwrap_or(Severity::Medium),
        rule: None,
    })
}

/// The reported span, if it is in range and addresses `original`.
fn claimed_span(source: &str, original: &str, start: f64, end: f64) -> Option<(usize, usize)> {
    if !(start >= 0.0 && start < end && start.fract() == 0.0 && end.fract() == 0.0) {
        return None;
    }
    let (start, end) = (start as usize, end as usize);
    (text::char_slice(source, start, end) == Some(original)).then_some((start, end))
}

/// Char span of the first occurrence of `needle`.
fn locate(source: &str, needle: &str) -> Option<(usize, usize)> {
    let byte_start = source.find(needle)?;
    let start = text::char_len(&source[..byte_start]);
    Some((start, start + text::char_len(needle)))
}

fn parse_kind(kind: Option<&str>) -> SuggestionKind {
    match kind.map(str::trim) {
        Some(k) if k.eq_ignore_ascii_case("punctuation") => SuggestionKind::Grammar,
        Some(k) => k.parse().unwrap_or(SuggestionKind::Style),
        None => SuggestionKind::Style,
    }
}

/// Best-effort recovery of `"original" -> "replacement"` lines.
pub fn parse_arrow_lines(reply: &str, source: &str) -> Vec<Suggestion> {
    ARROW_LINE
        .captures_iter(reply)
        .filter_map(|caps| {
            let original = caps.get(1)?.as_str();
            let replacement = caps.get(2)?.as_str();
            let (start, end) = locate(source, original)?;
            Some(Suggestion {
                id: format!("ai-{}", Uuid::new_v4()),
                kind: SuggestionKind::Style,
                start,
                end,
                original_text: original.to_string(),
                replacement_text: replacement.to_string(),
                message: "Suggested revision.".to_string(),
                severity: Severity::Low,
                rule: None,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "I could of gone to teh store.";

    #[test]
    fn valid_entry_kept_as_is() {
        let reply = r#"[{"original":"could of","suggestion":"could have","reason":"Modal verbs take have.","type":"grammar","severity":"high","start_pos":2,"end_pos":10}]"#;
        let suggestions = parse_suggestions(reply, SOURCE);
        assert_eq!(suggestions.len(), 1);
        let s = &suggestions[0];
        assert_eq!((s.start, s.end), (2, 10));
        assert_eq!(s.kind, SuggestionKind::Grammar);
        assert_eq!(s.severity, Severity::High);
        assert_eq!(s.message, "Modal verbs take have.");
        assert!(s.id.starts_with("ai-"));
        assert!(s.matches(SOURCE));
    }

    #[test]
    fn stale_offsets_are_repositioned() {
        let reply = r#"[{"original":"teh","suggestion":"the","reason":"Spelling.","type":"spelling","severity":"high","start_pos":0,"end_pos":3}]"#;
        let suggestions = parse_suggestions(reply, SOURCE);
        assert_eq!(suggestions.len(), 1);
        assert_eq!((suggestions[0].start, suggestions[0].end), (19, 22));
        assert!(suggestions[0].matches(SOURCE));
    }

    #[test]
    fn out_of_range_offsets_are_repositioned() {
        let reply = r#"[{"original":"teh","suggestion":"the","start_pos":400,"end_pos":403}]"#;
        let suggestions = parse_suggestions(reply, SOURCE);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].start, 19);
    }

    #[test]
    fn unlocatable_entry_dropped_but_batch_kept() {
        let reply = r#"[
            {"original":"banana","suggestion":"apple","start_pos":0,"end_pos":6},
            {"original":"teh","suggestion":"the","start_pos":19,"end_pos":22}
        ]"#;
        let suggestions = parse_suggestions(reply, SOURCE);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].original_text, "teh");
    }

    #[test]
    fn entries_missing_fields_dropped() {
        let reply = r#"[
            {"original":"teh","start_pos":19,"end_pos":22},
            {"suggestion":"the","start_pos":19,"end_pos":22},
            {"original":"teh","suggestion":"the"},
            {"original":"teh","suggestion":"the","start_pos":"19","end_pos":22},
            "not an object"
        ]"#;
        assert!(parse_suggestions(reply, SOURCE).is_empty());
    }

    #[test]
    fn array_embedded_in_prose() {
        let reply = "Sure! [Note] Here are the fixes:\n```json\n[{\"original\":\"teh\",\"suggestion\":\"the\",\"reason\":\"Typo [sic]\",\"type\":\"spelling\",\"severity\":\"low\",\"start_pos\":19,\"end_pos\":22}]\n```\nHope this helps.";
        let suggestions = parse_suggestions(reply, SOURCE);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].message, "Typo [sic]");
        assert_eq!(suggestions[0].severity, Severity::Low);
    }

    #[test]
    fn citation_brackets_before_array_are_skipped() {
        let reply = "Found 1 issue [1] (see [\"spelling\"]):\n[{\"original\":\"teh\",\"suggestion\":\"the\",\"type\":\"spelling\",\"severity\":\"high\",\"start_pos\":19,\"end_pos\":22}]";
        let suggestions = parse_suggestions(reply, SOURCE);
        assert_eq!(suggestions.len(), 1);
        assert_eq!((suggestions[0].start, suggestions[0].end), (19, 22));
        assert_eq!(suggestions[0].replacement_text, "the");
        assert_eq!(find_json_array("[1] then [2, 3]"), None);
    }

    #[test]
    fn unknown_type_and_severity_default() {
        let reply = r#"[
            {"original":"teh","suggestion":"the","type":"typo","severity":"urgent","start_pos":19,"end_pos":22},
            {"original":"could of","suggestion":"could have","type":"Punctuation","start_pos":2,"end_pos":10}
        ]"#;
        let suggestions = parse_suggestions(reply, SOURCE);
        assert_eq!(suggestions[0].kind, SuggestionKind::Style);
        assert_eq!(suggestions[0].severity, Severity::Medium);
        assert_eq!(suggestions[0].message, "Suggested improvement.");
        assert_eq!(suggestions[1].kind, SuggestionKind::Grammar);
    }

    #[test]
    fn empty_array_means_no_suggestions() {
        assert!(parse_suggestions("[]", SOURCE).is_empty());
    }

    #[test]
    fn arrow_line_fallback() {
        let reply = "I found two issues:\n\"could of\" -> \"could have\"\n“teh” → “the”\n\"nowhere\" => \"x\"";
        let suggestions = parse_suggestions(reply, SOURCE);
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].replacement_text, "could have");
        assert_eq!((suggestions[1].start, suggestions[1].end), (19, 22));
        assert!(suggestions.iter().all(|s| s.matches(SOURCE)));
    }

    #[test]
    fn garbage_reply_yields_nothing() {
        assert!(parse_suggestions("I cannot help with that.", SOURCE).is_empty());
        assert!(parse_suggestions("[unclosed", SOURCE).is_empty());
    }

    #[test]
    fn bracket_matching_skips_strings() {
        let s = r#"["a]b", ["c"]] tail"#;
        assert_eq!(matching_bracket(s, 0), Some(13));
    }

    #[test]
    fn multibyte_source_offsets() {
        let source = "Naïve writers recieve advice.";
        let reply = r#"[{"original":"recieve","suggestion":"receive","start_pos":0,"end_pos":7}]"#;
        let suggestions = parse_suggestions(reply, source);
        assert_eq!((suggestions[0].start, suggestions[0].end), (14, 21));
        assert!(suggestions[0].matches(source));
    }
}
