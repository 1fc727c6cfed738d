// src/bot/commands.rs

//! Chat command parsing.

use crate::models::normalize_selector;
use crate::utils::{extract_url, is_web_url};

pub const CHECK_USAGE: &str = "Usage: /check <url> or /check <url> | <css selector>";
pub const UNWATCH_USAGE: &str = "Usage: /unwatch <url>";

/// A parsed incoming chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start` or `/help`
    Help,
    /// `/check <url> [| <css>]`: check and watch
    Check { url: String, css: Option<String> },
    /// `/list`
    List,
    /// `/unwatch <url>`
    Unwatch { url: String },
    /// Plain message containing a URL: check once, don't save
    Probe { url: String },
    /// Unrecognized `/command`
    Unknown(String),
    /// Recognized command with bad arguments; carries the reply
    Invalid(String),
    /// Plain message without a URL
    NoUrl,
}

impl Command {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let Some(body) = text.strip_prefix('/') else {
            return match extract_url(text) {
                Some(url) => Command::Probe {
                    url: url.to_string(),
                },
                None => Command::NoUrl,
            };
        };

        let (head, args) = body
            .split_once(char::is_whitespace)
            .map(|(h, a)| (h, a.trim()))
            .unwrap_or((body, ""));
        // Group chats address commands as /name@botname
        let name = head.split('@').next().unwrap_or(head).to_lowercase();

        match name.as_str() {
            "start" | "help" => Command::Help,
            "check" => parse_check(args),
            "list" => Command::List,
            "unwatch" => match args.split_whitespace().next() {
                Some(url) => Command::Unwatch {
                    url: url.to_string(),
                },
                None => Command::Invalid(UNWATCH_USAGE.to_string()),
            },
            _ => Command::Unknown(name),
        }
    }
}

fn parse_check(args: &str) -> Command {
    if args.is_empty() {
        return Command::Invalid(CHECK_USAGE.to_string());
    }

    let (url, css) = match args.split_once(" | ") {
        Some((url, css)) => (url.trim(), normalize_selector(Some(css))),
        None => (args.split_whitespace().next().unwrap_or(args), None),
    };

    if !is_web_url(url) {
        return Command::Invalid(format!("Not a valid http(s) URL: {url}\n{CHECK_USAGE}"));
    }

    Command::Check {
        url: url.to_string(),
        css,
    }
}
