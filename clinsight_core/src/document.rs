//! Preparation of ingested documents before extraction.

use once_cell::sync::Lazy;
use regex::Regex;

static BLANK_RUNS: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\n\s*\n\s*\n+").ok());
static TABS: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\t+").ok());
static SCRIPT_OR_STYLE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>").ok());
static BLOCK_BREAK: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?>|</(?:p|div|li|tr|h[1-6])\s*>").ok());
static TAG: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"<[^>]*>").ok());

const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&amp;", "&"),
];

fn replace_all(re: &Lazy<Option<Regex>>, text: &str, with: &str) -> String {
    match re.as_ref() {
        Some(re) => re.replace_all(text, with).into_owned(),
        None => text.to_string(),
    }
}

/// Normalize raw case-report text.
///
/// Carriage returns become newlines, runs of blank lines collapse to a
/// single blank line and tabs collapse to a space. A trailing
/// `References` section is dropped when it starts in the last 40% of the
/// document.
#[must_use]
pub fn clean_text(raw: &str) -> String {
    let text = raw.replace('\r', "\n");
    let text = replace_all(&BLANK_RUNS, &text, "\n\n");
    let mut text = replace_all(&TABS, &text, " ");

    // ASCII lowering keeps byte offsets aligned with `text`
    if let Some(idx) = text.to_ascii_lowercase().rfind("\nreferences") {
        if idx * 5 > text.len() * 3 {
            text.truncate(idx);
        }
    }

    text.trim().to_string()
}

/// Reduce an HTML document to its visible text.
#[must_use]
pub fn strip_html(html: &str) -> String {
    let text = replace_all(&SCRIPT_OR_STYLE, html, "");
    let text = replace_all(&BLOCK_BREAK, &text, "\n");
    let mut text = replace_all(&TAG, &text, "");
    for (entity, decoded) in ENTITIES {
        text = text.replace(entity, decoded);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_normalizes_whitespace() {
        let raw = "Line one\r\n\r\n\r\n\r\nLine\ttwo\t\tend";
        assert_eq!(clean_text(raw), "Line one\n\nLine two end");
    }

    #[test]
    fn test_clean_text_drops_trailing_references() {
        let body = "Case presentation. ".repeat(20);
        let raw = format!("{body}\nReferences\n1. Smith J. Anesthesiology.");
        assert_eq!(clean_text(&raw), body.trim());
    }

    #[test]
    fn test_clean_text_references_cut_with_non_ascii_prefix() {
        // U+212A lowercases to a one-byte 'k'
        let raw = format!(
            "{}{}FINAL SENTENCE KEEP ME.\nReferences\n1. X",
            "\u{212A}".repeat(20),
            "Clinical course. ".repeat(30)
        );
        let cleaned = clean_text(&raw);
        assert!(cleaned.ends_with("FINAL SENTENCE KEEP ME."), "{cleaned}");
        assert!(!cleaned.contains("References"));
    }

    #[test]
    fn test_clean_text_keeps_early_references() {
        let raw = format!("Intro\nReferences to prior cases\n{}", "Body text. ".repeat(20));
        assert!(clean_text(&raw).contains("References to prior cases"));
    }

    #[test]
    fn test_strip_html() {
        let html = "<html><head><style>p { color: red; }</style>\
                    <script>alert('x')</script></head>\
                    <body><p>ASA&nbsp;III</p><p>Weight: 82 kg &amp; stable</p></body></html>";
        assert_eq!(strip_html(html), "ASA III\nWeight: 82 kg & stable\n");
    }
}
