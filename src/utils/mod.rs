//! Utility functions and helpers.

pub mod http;

use url::Url;

/// Find the first http(s) URL in free text.
pub fn extract_url(text: &str) -> Option<&str> {
    let pattern = regex::Regex::new(r"https?://\S+").ok()?;
    pattern.find(text).map(|m| m.as_str())
}

/// Check that a string is an absolute http or https URL.
pub fn is_web_url(candidate: &str) -> bool {
    Url::parse(candidate)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}

/// Collapse runs of whitespace into single spaces.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut `text` to at most `max_chars` characters, appending "..." if cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
