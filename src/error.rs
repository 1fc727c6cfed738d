// src/error.rs

//! Unified error handling for the stock watcher.

use std::fmt;

use thiserror::Error;

use crate::models::UserId;

/// Result type alias for stock watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Persisted document decoded but has an unexpected shape
    #[error("Schema error: {0}")]
    Schema(String),

    /// Page could not be fetched
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Notification could not be delivered
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a schema error.
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }
}

/// Any failure to retrieve a page: network, timeout, HTTP status or block.
///
/// Callers only care whether the fetch worked, so every cause collapses
/// into this one type with a diagnostic message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to fetch {url}: {message}")]
pub struct FetchError {
    pub url: String,
    pub message: String,
}

impl FetchError {
    pub fn new(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self {
            url: url.into(),
            message: message.to_string(),
        }
    }
}

/// The chat transport rejected a message for a user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to notify user {user_id}: {message}")]
pub struct NotifyError {
    pub user_id: UserId,
    pub message: String,
}

impl NotifyError {
    pub fn new(user_id: UserId, message: impl fmt::Display) -> Self {
        Self {
            user_id,
            message: message.to_string(),
        }
    }
}
