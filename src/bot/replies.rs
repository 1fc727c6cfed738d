// src/bot/replies.rs

//! Reply texts sent back to chat users.

use crate::models::{CheckResult, Subscription};

pub const HELP: &str = "Send me a product URL and I'll check availability.\n\
Commands:\n\
• /check <url>\n\
• /check <url> | <css selector>\n\
• /list - show your watched URLs\n\
• /unwatch <url> - stop watching a URL";

pub const SAVED: &str = "Saved ✅ I'll keep checking this link periodically.";
pub const ALREADY_WATCHED: &str = "You're already watching this link.";
pub const NOT_SAVED: &str = "Couldn't reach the page, so it wasn't saved. Try again later.";
pub const EMPTY_WATCHLIST: &str = "You aren't watching any URLs yet.";
pub const NOT_WATCHED: &str = "That URL wasn't in your watchlist.";
pub const PROBE_TIP: &str = "Tip: use /check <url> to monitor it periodically.";
pub const NO_URL: &str = "Please send a product URL or use /check <url>";
pub const STORAGE_FAILED: &str = "Sorry, your watchlist couldn't be updated right now.";

/// Title line (if any), status and final URL.
///
/// `requested` is shown when the result carries no URL of its own.
pub fn verdict(result: &CheckResult, requested: &str) -> String {
    let url = result.url.as_deref().unwrap_or(requested);
    let mut text = String::new();
    if let Some(title) = result.title.as_deref().filter(|t| !t.is_empty()) {
        text.push_str(title);
        text.push('\n');
    }
    text.push_str(&format!("Status: {}\nURL: {}", result.status, url));
    text
}

pub fn watchlist(entries: &[Subscription]) -> String {
    if entries.is_empty() {
        return EMPTY_WATCHLIST.to_string();
    }

    let lines: Vec<String> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let mut line = format!("{}. {} (last: {})", i + 1, entry.url, entry.last_status);
            if let Some(css) = &entry.css {
                line.push_str(&format!(" [{css}]"));
            }
            line
        })
        .collect();

    format!("Your watchlist:\n{}", lines.join("\n"))
}

pub fn removed(url: &str) -> String {
    format!("Removed from watchlist: {url}")
}

pub fn unknown_command(name: &str) -> String {
    format!("Unknown command /{name}. Send /help to see what I can do.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;

    #[test]
    fn test_verdict_with_title() {
        let result = CheckResult::new(Status::Available, "Matched keyword: in stock")
            .with_title(Some("Blue Kettle".to_string()))
            .with_url("https://shop.example/kettle?ref=1");
        assert_eq!(
            verdict(&result, "https://shop.example/kettle"),
            "Blue Kettle\nStatus: AVAILABLE\nURL: https://shop.example/kettle?ref=1"
        );
    }

    #[test]
    fn test_verdict_falls_back_to_requested_url() {
        let result = CheckResult::unknown("Request failed: timed out");
        assert_eq!(
            verdict(&result, "https://shop.example/a"),
            "Status: UNKNOWN\nURL: https://shop.example/a"
        );
    }

    #[test]
    fn test_watchlist_lines() {
        let entries = vec![
            Subscription::new("https://shop.example/a", None, Status::OutOfStock),
            Subscription::new("https://shop.example/b", Some("#stock"), Status::Unknown),
        ];
        assert_eq!(
            watchlist(&entries),
            "Your watchlist:\n\
             1. https://shop.example/a (last: OUT_OF_STOCK)\n\
             2. https://shop.example/b (last: UNKNOWN) [#stock]"
        );
        assert_eq!(watchlist(&[]), EMPTY_WATCHLIST);
    }
}
