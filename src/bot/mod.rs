// src/bot/mod.rs

//! Chat front end: turns incoming messages into replies.
//!
//! The transport (console, messenger API) stays outside; it feeds
//! `(user_id, text)` pairs to [`ChatBot::handle`] and sends back every
//! returned string as a separate message.

pub mod commands;
pub mod replies;

pub use commands::Command;

use std::sync::Arc;

use crate::models::UserId;
use crate::services::{Fetcher, Monitor, WatchDisposition};

pub struct ChatBot<F> {
    monitor: Arc<Monitor<F>>,
}

impl<F: Fetcher> ChatBot<F> {
    pub fn new(monitor: Arc<Monitor<F>>) -> Self {
        Self { monitor }
    }

    pub async fn handle(&self, user_id: UserId, text: &str) -> Vec<String> {
        let command = Command::parse(text);
        log::debug!("User {}: {:?}", user_id, command);

        match command {
            Command::Help => vec![replies::HELP.to_string()],
            Command::Check { url, css } => self.watch(user_id, &url, css.as_deref()).await,
            Command::List => match self.monitor.handle_list_request(user_id).await {
                Ok(entries) => vec![replies::watchlist(&entries)],
                Err(e) => {
                    log::error!("Failed to list watches for user {}: {}", user_id, e);
                    vec![replies::STORAGE_FAILED.to_string()]
                }
            },
            Command::Unwatch { url } => {
                match self.monitor.handle_unwatch_request(user_id, &url).await {
                    Ok(true) => vec![replies::removed(&url)],
                    Ok(false) => vec![replies::NOT_WATCHED.to_string()],
                    Err(e) => {
                        log::error!("Failed to unwatch {} for user {}: {}", url, user_id, e);
                        vec![replies::STORAGE_FAILED.to_string()]
                    }
                }
            }
            Command::Probe { url } => {
                let result = self.monitor.handle_check_request(&url, None).await;
                vec![
                    replies::verdict(&result, &url),
                    replies::PROBE_TIP.to_string(),
                ]
            }
            Command::Unknown(name) => vec![replies::unknown_command(&name)],
            Command::Invalid(usage) => vec![usage],
            Command::NoUrl => vec![replies::NO_URL.to_string()],
        }
    }

    async fn watch(&self, user_id: UserId, url: &str, css: Option<&str>) -> Vec<String> {
        let outcome = match self.monitor.handle_watch_request(user_id, url, css).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Failed to save watch {} for user {}: {}", url, user_id, e);
                return vec![replies::STORAGE_FAILED.to_string()];
            }
        };

        let follow_up = match outcome.disposition {
            WatchDisposition::Added => replies::SAVED,
            WatchDisposition::AlreadyWatched => replies::ALREADY_WATCHED,
            WatchDisposition::NotSaved => replies::NOT_SAVED,
        };
        vec![
            replies::verdict(&outcome.result, url),
            follow_up.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::ScriptedFetcher;
    use crate::services::{AvailabilityChecker, Classifier};
    use crate::storage::SubscriptionStore;
    use tempfile::TempDir;

    const URL: &str = "https://shop.example/kettle";

    fn bot(tmp: &TempDir, fetcher: &ScriptedFetcher) -> ChatBot<ScriptedFetcher> {
        let checker = AvailabilityChecker::new(fetcher.clone(), Classifier::default());
        let store = SubscriptionStore::new(tmp.path().join("subs.json"));
        ChatBot::new(Arc::new(Monitor::new(Arc::new(checker), Arc::new(store))))
    }

    #[tokio::test]
    async fn test_check_then_list_then_unwatch() {
        let tmp = TempDir::new().unwrap();
        let fetcher = ScriptedFetcher::new();
        fetcher.serve(
            URL,
            "<html><head><title>Kettle</title></head><body><p>Sold out</p></body></html>",
        );
        let bot = bot(&tmp, &fetcher);

        let replies = bot.handle(7, &format!("/check {URL}")).await;
        assert_eq!(
            replies,
            vec![
                format!("Kettle\nStatus: OUT_OF_STOCK\nURL: {URL}"),
                replies::SAVED.to_string(),
            ]
        );

        let again = bot.handle(7, &format!("/check {URL}")).await;
        assert_eq!(again[1], replies::ALREADY_WATCHED);

        let list = bot.handle(7, "/list").await;
        assert_eq!(
            list,
            vec![format!("Your watchlist:\n1. {URL} (last: OUT_OF_STOCK)")]
        );

        let removed = bot.handle(7, &format!("/unwatch {URL}")).await;
        assert_eq!(removed, vec![format!("Removed from watchlist: {URL}")]);
        let missing = bot.handle(7, &format!("/unwatch {URL}")).await;
        assert_eq!(missing, vec![replies::NOT_WATCHED.to_string()]);
        assert_eq!(bot.handle(7, "/list").await, vec![replies::EMPTY_WATCHLIST.to_string()]);
    }

    #[tokio::test]
    async fn test_probe_is_not_saved() {
        let tmp = TempDir::new().unwrap();
        let fetcher = ScriptedFetcher::new();
        fetcher.serve(URL, "<button>Add to cart</button>");
        let bot = bot(&tmp, &fetcher);

        let replies = bot.handle(7, &format!("what about {URL} ?")).await;
        assert_eq!(replies.len(), 2);
        assert!(replies[0].contains("Status: AVAILABLE"));
        assert_eq!(replies[1], replies::PROBE_TIP);
        assert_eq!(bot.handle(7, "/list").await, vec![replies::EMPTY_WATCHLIST.to_string()]);
    }

    #[tokio::test]
    async fn test_unreachable_page_is_not_saved() {
        let tmp = TempDir::new().unwrap();
        let fetcher = ScriptedFetcher::new();
        fetcher.fail(URL, "request timed out");
        let bot = bot(&tmp, &fetcher);

        let replies = bot.handle(7, &format!("/check {URL}")).await;
        assert_eq!(replies[0], format!("Status: UNKNOWN\nURL: {URL}"));
        assert_eq!(replies[1], replies::NOT_SAVED);
        assert_eq!(bot.handle(7, "/list").await, vec![replies::EMPTY_WATCHLIST.to_string()]);
    }

    #[tokio::test]
    async fn test_plain_replies() {
        let tmp = TempDir::new().unwrap();
        let bot = bot(&tmp, &ScriptedFetcher::new());

        assert_eq!(bot.handle(1, "hello").await, vec![replies::NO_URL.to_string()]);
        assert_eq!(bot.handle(1, "/help").await, vec![replies::HELP.to_string()]);
        assert_eq!(
            bot.handle(1, "/check").await,
            vec![commands::CHECK_USAGE.to_string()]
        );
        assert!(bot.handle(1, "/nope").await[0].starts_with("Unknown command /nope"));
    }
}
