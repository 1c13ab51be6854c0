//! Rule evaluation: text in, sorted and deduplicated suggestions out.

use std::collections::HashSet;

use tracing::{debug, trace};

use penwise_core::text::{self, OffsetMap};
use penwise_core::Suggestion;

use crate::rules::{self, Rule};

/// Run the built-in rule table over `text`.
pub fn check(text: &str) -> Vec<Suggestion> {
    check_with_rules(text, rules::rules())
}

/// Run an arbitrary ordered rule table over `text`.
///
/// Output is sorted by `start`; of several suggestions with the same
/// `(start, end)` only the one from the earliest rule is kept.
pub fn check_with_rules(text: &str, rules: &[Rule]) -> Vec<Suggestion> {
    if text::is_blank(text) {
        return Vec::new();
    }

    let map = OffsetMap::new(text);
    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    let mut suggestions = Vec::new();

    for rule in rules {
        let mut hits = 0usize;
        for caps in rule.pattern.captures_iter(text) {
            let Some(m) = caps.get(0) else { continue };
            if m.is_empty() {
                continue;
            }
            let span = map.char_range(m.range());
            if seen.insert((span.start, span.end)) {
                suggestions.push(Suggestion {
                    id: format!("local-{}-{}", rule.id, span.start),
                    kind: rule.category.kind(),
                    start: span.start,
                    end: span.end,
                    original_text: m.as_str().to_string(),
                    replacement_text: rule.render(&caps),
                    message: rule.message.clone(),
                    severity: rule.severity,
                    rule: Some(rule.id.clone()),
                });
            }
            hits += 1;
            if !rule.global {
                break;
            }
        }
        if hits > 0 {
            trace!(rule = %rule.id, hits, "rule matched");
        }
    }

    // Stable: ties keep rule-table order.
    suggestions.sort_by_key(|s| s.start);
    debug!(
        chars = map.char_count(),
        suggestions = suggestions.len(),
        "local check complete"
    );
    suggestions
}
