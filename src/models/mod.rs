// src/models/mod.rs

//! Domain models for the stock watcher.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod check;
mod config;
mod status;
mod subscription;

// Re-export all public types
pub use check::CheckResult;
pub use config::{Config, FetcherConfig, KeywordConfig, SchedulerConfig, StorageConfig};
pub use status::Status;
pub use subscription::{Subscription, Subscriptions, UserId, normalize_selector};
