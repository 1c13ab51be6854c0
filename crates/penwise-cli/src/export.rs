//! Plain-text export of documents and their analysis reports.

use std::path::{Path, PathBuf};

use anyhow::Context;
use penwise_check::AnalysisReport;

use crate::display::report_lines;

fn heading(title: &str) -> String {
    let title = if title.trim().is_empty() {
        "Untitled"
    } else {
        title.trim()
    };
    format!("{title}\n{}\n", "=".repeat(title.chars().count()))
}

/// `(title, content)` as a plain-text file body.
pub fn render_document(title: &str, content: &str) -> String {
    let mut out = heading(title);
    out.push('\n');
    out.push_str(content.trim_end());
    out.push('\n');
    out
}

/// `(title, report)` as a plain-text file body.
pub fn render_report(title: &str, report: &AnalysisReport) -> String {
    let mut out = heading(&format!("Writing report: {}", title.trim()));
    out.push('\n');
    for line in report_lines(report) {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// File name derived from the title: lowercase ASCII words joined by `-`.
pub fn default_file_name(title: &str, report: bool) -> PathBuf {
    let slug: String = title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    let stem = if slug.is_empty() { "document".to_string() } else { slug };
    let suffix = if report { "-report" } else { "" };
    PathBuf::from(format!("{stem}{suffix}.txt"))
}

pub fn write_export(path: &Path, body: &str) -> anyhow::Result<()> {
    std::fs::write(path, body).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_export_layout() {
        let body = render_document("My Essay", "First line.\n\nSecond.\n\n");
        assert_eq!(body, "My Essay\n========\n\nFirst line.\n\nSecond.\n");
    }

    #[test]
    fn untitled_heading() {
        assert!(render_document("  ", "x").starts_with("Untitled\n========\n"));
    }

    #[test]
    fn report_export_contains_scores() {
        let report = penwise_check::analyze("I could of gone.");
        let body = render_report("Essay", &report);
        assert!(body.starts_with("Writing report: Essay\n"));
        assert!(body.contains("correctness"));
        assert!(body.contains("Tone"));
    }

    #[test]
    fn file_names() {
        assert_eq!(default_file_name("My Essay: Draft #2", false), PathBuf::from("my-essay-draft-2.txt"));
        assert_eq!(default_file_name("", true), PathBuf::from("document-report.txt"));
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        write_export(&path, "hello\n").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "hello\n");
    }
}
