//! Storage abstractions for subscription persistence.
//!
//! A single JSON document holds every user's watch list:
//!
//! ```text
//! data/
//! ├── subscriptions.json      # user id -> [{url, css, last_status}]
//! └── subscriptions.tmp       # transient, exists only mid-write
//! ```

pub mod subscriptions;

// Re-export for convenience
pub use subscriptions::SubscriptionStore;
