// src/pipeline/recheck.rs

//! One pass over every stored subscription.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::Result;
use crate::pipeline::StatusTransition;
use crate::services::{AvailabilityChecker, Fetcher, Notifier};
use crate::storage::SubscriptionStore;

/// Summary of a re-check run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecheckSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Subscriptions checked
    pub checked: usize,
    /// Subscriptions whose status differs from the stored one
    pub changed: usize,
    /// Restock notifications delivered
    pub notified: usize,
    pub notify_failures: usize,
    pub persist_failures: usize,
    /// Run stopped early because shutdown was requested
    pub interrupted: bool,
}

impl RecheckSummary {
    fn start() -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            checked: 0,
            changed: 0,
            notified: 0,
            notify_failures: 0,
            persist_failures: 0,
            interrupted: false,
        }
    }
}

/// Re-check every subscription and notify users about restocks.
///
/// Subscriptions are processed one at a time, users in ascending id order.
/// Persist and delivery failures are logged and counted; they never stop
/// the run. Only reading the initial snapshot can fail.
pub async fn run_recheck<F: Fetcher>(
    checker: &AvailabilityChecker<F>,
    store: &SubscriptionStore,
    notifier: &dyn Notifier,
    shutdown: Option<&watch::Receiver<bool>>,
) -> Result<RecheckSummary> {
    let mut summary = RecheckSummary::start();
    let snapshot = store.get_all().await?;
    let total: usize = snapshot.values().map(Vec::len).sum();

    log::info!(
        "Re-checking {} subscription(s) for {} user(s)",
        total,
        snapshot.len()
    );

    'users: for (user_id, entries) in &snapshot {
        for entry in entries {
            if shutdown.is_some_and(|rx| *rx.borrow()) {
                log::warn!("Shutdown requested; stopping re-check early");
                summary.interrupted = true;
                break 'users;
            }

            let result = checker.check(&entry.url, entry.css.as_deref()).await;
            summary.checked += 1;

            let transition =
                StatusTransition::new(*user_id, &entry.url, entry.last_status, result.status);
            if transition.is_change() {
                summary.changed += 1;
                log::info!(
                    "User {}: {} changed {} -> {}",
                    user_id,
                    entry.url,
                    transition.previous,
                    transition.current
                );
            }

            if let Err(e) = store
                .update_entry_status(*user_id, &entry.url, entry.css.as_deref(), result.status)
                .await
            {
                summary.persist_failures += 1;
                log::error!(
                    "Failed to persist status for user {} and {}: {}",
                    user_id,
                    entry.url,
                    e
                );
            }

            if transition.is_restock() {
                match notifier.notify(*user_id, &transition.message()).await {
                    Ok(()) => summary.notified += 1,
                    Err(e) => {
                        summary.notify_failures += 1;
                        log::error!("{} (for {})", e, entry.url);
                    }
                }
            }
        }
    }

    summary.finished_at = Utc::now();
    log::info!(
        "Re-check done: {} checked, {} changed, {} notified, {} notify failure(s), {} persist failure(s)",
        summary.checked,
        summary.changed,
        summary.notified,
        summary.notify_failures,
        summary.persist_failures
    );
    Ok(summary)
}
