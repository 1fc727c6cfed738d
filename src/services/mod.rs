//! Service layer for the stock watcher.
//!
//! This module contains the business logic for:
//! - Page fetching (`Fetcher`, `HttpFetcher`)
//! - Availability classification (`Classifier`)
//! - Fetch-and-classify (`AvailabilityChecker`)
//! - Chat-facing operations (`Monitor`)
//! - User notifications (`Notifier`)

mod checker;
mod classifier;
mod fetcher;
mod monitor;
mod notifier;

#[cfg(test)]
pub(crate) mod testing;

pub use checker::AvailabilityChecker;
pub use classifier::Classifier;
pub use fetcher::{FetchedPage, Fetcher, HttpFetcher};
pub use monitor::{Monitor, WatchDisposition, WatchOutcome};
pub use notifier::{ConsoleNotifier, Notifier};
