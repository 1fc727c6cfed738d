// src/models/check.rs

//! Classification outcome for one fetch attempt.

use serde::{Deserialize, Serialize};

use crate::models::Status;

/// Verdict produced by a single availability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Availability verdict
    pub status: Status,

    /// Human-readable evidence for the verdict
    pub reason: String,

    /// Page title, if the document has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Final URL reached after redirects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl CheckResult {
    pub fn new(status: Status, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
            title: None,
            url: None,
        }
    }

    /// An `UNKNOWN` verdict carrying only an explanation.
    pub fn unknown(reason: impl Into<String>) -> Self {
        Self::new(Status::Unknown, reason)
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}
