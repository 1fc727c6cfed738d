// src/services/monitor.rs

//! Entry points used by the chat transport.

use std::sync::Arc;

use crate::error::Result;
use crate::models::{CheckResult, Subscription, UserId};
use crate::services::{AvailabilityChecker, Fetcher};
use crate::storage::SubscriptionStore;

/// What happened to a watch request's subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchDisposition {
    /// A new subscription was stored
    Added,
    /// The same url and selector were already watched
    AlreadyWatched,
    /// The page could not be fetched, so nothing was stored
    NotSaved,
}

/// Verdict plus persistence outcome of a watch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchOutcome {
    pub result: CheckResult,
    pub disposition: WatchDisposition,
}

/// Check, watch, list and unwatch operations over one store.
pub struct Monitor<F> {
    checker: Arc<AvailabilityChecker<F>>,
    store: Arc<SubscriptionStore>,
}

impl<F: Fetcher> Monitor<F> {
    pub fn new(checker: Arc<AvailabilityChecker<F>>, store: Arc<SubscriptionStore>) -> Self {
        Self { checker, store }
    }

    pub fn checker(&self) -> &Arc<AvailabilityChecker<F>> {
        &self.checker
    }

    pub fn store(&self) -> &Arc<SubscriptionStore> {
        &self.store
    }

    /// One-off check; nothing is persisted.
    pub async fn handle_check_request(&self, url: &str, css: Option<&str>) -> CheckResult {
        self.checker.check(url, css).await
    }

    /// Check and, when the page was reachable, subscribe the user.
    ///
    /// The fetch runs before the store lock is taken.
    pub async fn handle_watch_request(
        &self,
        user_id: UserId,
        url: &str,
        css: Option<&str>,
    ) -> Result<WatchOutcome> {
        let result = match self.checker.try_check(url, css).await {
            Ok(result) => result,
            Err(e) => {
                log::warn!("Not saving watch for user {}: {}", user_id, e);
                return Ok(WatchOutcome {
                    result: CheckResult::unknown(format!("Request failed: {}", e.message))
                        .with_url(url),
                    disposition: WatchDisposition::NotSaved,
                });
            }
        };

        let added = self.store.add(user_id, url, result.status, css).await?;
        let disposition = if added {
            WatchDisposition::Added
        } else {
            WatchDisposition::AlreadyWatched
        };

        Ok(WatchOutcome {
            result,
            disposition,
        })
    }

    pub async fn handle_list_request(&self, user_id: UserId) -> Result<Vec<Subscription>> {
        self.store.list_for(user_id).await
    }

    pub async fn handle_unwatch_request(&self, user_id: UserId, url: &str) -> Result<bool> {
        self.store.remove(user_id, url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;
    use crate::services::Classifier;
    use crate::services::testing::ScriptedFetcher;
    use tempfile::TempDir;

    fn monitor(tmp: &TempDir, fetcher: ScriptedFetcher) -> Monitor<ScriptedFetcher> {
        Monitor::new(
            Arc::new(AvailabilityChecker::new(fetcher, Classifier::default())),
            Arc::new(SubscriptionStore::new(tmp.path().join("subs.json"))),
        )
    }

    #[tokio::test]
    async fn test_check_request_does_not_persist() {
        let tmp = TempDir::new().unwrap();
        let fetcher = ScriptedFetcher::new();
        fetcher.serve("https://shop.example/a", "<p>In stock</p>");
        let monitor = monitor(&tmp, fetcher);

        let result = monitor.handle_check_request("https://shop.example/a", None).await;
        assert_eq!(result.status, Status::Available);
        assert!(monitor.handle_list_request(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_watch_request_stores_verdict_status() {
        let tmp = TempDir::new().unwrap();
        let fetcher = ScriptedFetcher::new();
        fetcher.serve("https://shop.example/a", "<p>Sold out</p>");
        let monitor = monitor(&tmp, fetcher);

        let outcome = monitor
            .handle_watch_request(5, "https://shop.example/a", Some(" "))
            .await
            .unwrap();
        assert_eq!(outcome.disposition, WatchDisposition::Added);
        assert_eq!(outcome.result.status, Status::OutOfStock);

        let again = monitor
            .handle_watch_request(5, "https://shop.example/a", None)
            .await
            .unwrap();
        assert_eq!(again.disposition, WatchDisposition::AlreadyWatched);

        let entries = monitor.handle_list_request(5).await.unwrap();
        assert_eq!(entries, vec![Subscription::new("https://shop.example/a", None, Status::OutOfStock)]);
    }

    #[tokio::test]
    async fn test_watch_request_skips_unreachable_page() {
        let tmp = TempDir::new().unwrap();
        let fetcher = ScriptedFetcher::new();
        fetcher.fail("https://shop.example/a", "request timed out");
        let monitor = monitor(&tmp, fetcher);

        let outcome = monitor
            .handle_watch_request(5, "https://shop.example/a", None)
            .await
            .unwrap();
        assert_eq!(outcome.disposition, WatchDisposition::NotSaved);
        assert_eq!(outcome.result.status, Status::Unknown);
        assert!(monitor.handle_list_request(5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unwatch_request() {
        let tmp = TempDir::new().unwrap();
        let fetcher = ScriptedFetcher::new();
        fetcher.serve("https://shop.example/a", "<p>Sold out</p>");
        let monitor = monitor(&tmp, fetcher);

        monitor
            .handle_watch_request(5, "https://shop.example/a", None)
            .await
            .unwrap();
        assert!(monitor.handle_unwatch_request(5, "https://shop.example/a").await.unwrap());
        assert!(!monitor.handle_unwatch_request(5, "https://shop.example/a").await.unwrap());
    }
}
