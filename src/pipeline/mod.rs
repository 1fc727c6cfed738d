//! Pipeline entry points for periodic re-checks.
//!
//! - `run_recheck`: Re-check every subscription once and notify restocks
//! - `Scheduler`: Drive `run_recheck` on an interval, skipping overlaps

pub mod diff;
pub mod recheck;
pub mod schedule;

pub use diff::StatusTransition;
pub use recheck::{RecheckSummary, run_recheck};
pub use schedule::Scheduler;
