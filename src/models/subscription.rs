// src/models/subscription.rs

//! Persisted watch entries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::Status;

/// Chat user identifier.
pub type UserId = i64;

/// All subscriptions keyed by user, in ascending user order.
pub type Subscriptions = BTreeMap<UserId, Vec<Subscription>>;

/// A watched URL with its cached last status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Product page URL as submitted by the user
    pub url: String,

    /// Optional CSS selector narrowing the checked zone
    #[serde(default)]
    pub css: Option<String>,

    /// Status observed on the most recent check
    #[serde(default)]
    pub last_status: Status,
}

impl Subscription {
    pub fn new(url: impl Into<String>, css: Option<&str>, last_status: Status) -> Self {
        Self {
            url: url.into(),
            css: normalize_selector(css),
            last_status,
        }
    }

    /// Whether this entry watches the same (url, selector) pair.
    pub fn same_target(&self, url: &str, css: Option<&str>) -> bool {
        self.url == url && normalize_selector(self.css.as_deref()) == normalize_selector(css)
    }
}

/// Trim a selector; blank selectors are equivalent to none.
pub fn normalize_selector(css: Option<&str>) -> Option<String> {
    css.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
