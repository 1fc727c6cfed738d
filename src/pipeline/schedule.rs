// src/pipeline/schedule.rs

//! Periodic driver for [`run_recheck`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::models::SchedulerConfig;
use crate::pipeline::{RecheckSummary, run_recheck};
use crate::services::{AvailabilityChecker, Fetcher, Notifier};
use crate::storage::SubscriptionStore;

/// Runs re-checks on a fixed interval, never two at once.
pub struct Scheduler<F> {
    checker: Arc<AvailabilityChecker<F>>,
    store: Arc<SubscriptionStore>,
    notifier: Arc<dyn Notifier>,
    config: SchedulerConfig,
    running: AtomicBool,
}

/// Clears the in-flight flag when a run ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<F: Fetcher> Scheduler<F> {
    pub fn new(
        checker: Arc<AvailabilityChecker<F>>,
        store: Arc<SubscriptionStore>,
        notifier: Arc<dyn Notifier>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            checker,
            store,
            notifier,
            config,
            running: AtomicBool::new(false),
        }
    }

    /// Whether a run is currently in progress.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Start one run unless another is still active.
    ///
    /// Returns `None` when the run was skipped or could not read the store.
    pub async fn trigger(
        &self,
        shutdown: Option<&watch::Receiver<bool>>,
    ) -> Option<RecheckSummary> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::warn!("Previous re-check still running; skipping this trigger");
            return None;
        }
        let _in_flight = InFlight(&self.running);

        match run_recheck(&self.checker, &self.store, self.notifier.as_ref(), shutdown).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                log::error!("Re-check run failed: {}", e);
                None
            }
        }
    }

    /// Fire `trigger` on the configured interval until `shutdown` turns true
    /// or its sender is dropped. Other updates on the channel are ignored.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        log::info!(
            "Scheduler started: first run in {}s, then every {} minute(s)",
            self.config.first_run_delay_secs,
            self.config.interval_minutes
        );

        let stopped = tokio::select! {
            biased;
            _ = stop_requested(&mut shutdown) => true,
            _ = tokio::time::sleep(self.config.first_run_delay()) => false,
        };
        if stopped {
            log::info!("Scheduler stopped before the first run");
            return;
        }

        let mut ticker = tokio::time::interval(self.config.interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let stopped = tokio::select! {
                biased;
                _ = stop_requested(&mut shutdown) => true,
                _ = ticker.tick() => false,
            };
            if stopped {
                break;
            }
            self.trigger(Some(&shutdown)).await;
        }

        log::info!("Scheduler stopped");
    }
}

/// Resolves once the flag is true or the sender is gone.
async fn stop_requested(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}
