//! Change detection between consecutive checks of a subscription.
//!
//! Only a move *into* `AVAILABLE` is worth a message; staying available,
//! going out of stock or becoming unknown are silent.

use serde::{Deserialize, Serialize};

use crate::models::{Status, UserId};

/// Previous and current status of one subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTransition {
    pub user_id: UserId,
    pub url: String,
    pub previous: Status,
    pub current: Status,
}

impl StatusTransition {
    pub fn new(user_id: UserId, url: impl Into<String>, previous: Status, current: Status) -> Self {
        Self {
            user_id,
            url: url.into(),
            previous,
            current,
        }
    }

    /// Whether the status changed at all.
    pub fn is_change(&self) -> bool {
        self.previous != self.current
    }

    /// Whether the item just came (back) into stock.
    pub fn is_restock(&self) -> bool {
        !self.previous.is_available() && self.current.is_available()
    }

    /// Notification text for a restock.
    pub fn message(&self) -> String {
        format!("✅ Item is now AVAILABLE:\n{}", self.url)
    }
}
