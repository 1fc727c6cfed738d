//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP fetching behavior settings
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Periodic re-check settings
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Subscription persistence settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Availability keyword lists
    #[serde(default)]
    pub keywords: KeywordConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Numeric values that fail to parse leave the current setting untouched.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(timeout) = lookup("REQUEST_TIMEOUT").and_then(|v| v.trim().parse::<f64>().ok())
        {
            self.fetcher.timeout_secs = timeout;
        }
        if let Some(minutes) =
            lookup("CHECK_INTERVAL_MINUTES").and_then(|v| v.trim().parse::<u64>().ok())
        {
            self.scheduler.interval_minutes = minutes;
        }
        if let Some(path) = lookup("SUBSCRIPTIONS_PATH").filter(|v| !v.trim().is_empty()) {
            self.storage.subscriptions_path = PathBuf::from(path);
        }
        if let Some(agent) = lookup("USER_AGENT").filter(|v| !v.trim().is_empty()) {
            self.fetcher.user_agent = agent;
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        let timeout = self.fetcher.timeout_secs;
        if !timeout.is_finite() || timeout <= 0.0 {
            return Err(AppError::validation("fetcher.timeout_secs must be > 0"));
        }
        if Duration::try_from_secs_f64(timeout).is_err() {
            return Err(AppError::validation("fetcher.timeout_secs is too large"));
        }
        if self.fetcher.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetcher.user_agent is empty"));
        }
        if self.fetcher.user_agents.iter().any(|ua| ua.trim().is_empty()) {
            return Err(AppError::validation(
                "fetcher.user_agents contains an empty entry",
            ));
        }
        if self.scheduler.interval_minutes == 0 {
            return Err(AppError::validation(
                "scheduler.interval_minutes must be > 0",
            ));
        }
        if self.scheduler.interval_minutes.checked_mul(60).is_none() {
            return Err(AppError::validation(
                "scheduler.interval_minutes is too large",
            ));
        }
        if self.storage.subscriptions_path.as_os_str().is_empty() {
            return Err(AppError::validation("storage.subscriptions_path is empty"));
        }
        if self.keywords.available.is_empty() || self.keywords.unavailable.is_empty() {
            return Err(AppError::validation("No availability keywords defined"));
        }
        if self.keywords.purchase_controls.is_empty() {
            return Err(AppError::validation("No purchase control phrases defined"));
        }
        Ok(())
    }
}

/// HTTP client identity and limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: f64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Optional pool rotated round-robin instead of `user_agent`
    #[serde(default)]
    pub user_agents: Vec<String>,

    /// Accept-Language header value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept_language: Option<String>,

    /// Maximum redirects followed per request
    #[serde(default = "defaults::max_redirects")]
    pub max_redirects: usize,
}

impl FetcherConfig {
    /// Request timeout. Values `validate` would reject saturate instead of panicking.
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_secs).unwrap_or(Duration::MAX)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::timeout(),
            user_agent: defaults::user_agent(),
            user_agents: Vec::new(),
            accept_language: None,
            max_redirects: defaults::max_redirects(),
        }
    }
}

/// Re-check schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Minutes between re-check runs
    #[serde(default = "defaults::interval_minutes")]
    pub interval_minutes: u64,

    /// Delay before the first run after startup
    #[serde(default = "defaults::first_run_delay")]
    pub first_run_delay_secs: u64,
}

impl SchedulerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.saturating_mul(60))
    }

    pub fn first_run_delay(&self) -> Duration {
        Duration::from_secs(self.first_run_delay_secs)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_minutes: defaults::interval_minutes(),
            first_run_delay_secs: defaults::first_run_delay(),
        }
    }
}

/// Subscription document location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "defaults::subscriptions_path")]
    pub subscriptions_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            subscriptions_path: defaults::subscriptions_path(),
        }
    }
}

/// Phrases used by the classifier. Matching is case-insensitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordConfig {
    /// In-stock phrases
    #[serde(default = "defaults::available_keywords")]
    pub available: Vec<String>,

    /// Out-of-stock phrases, checked before `available`
    #[serde(default = "defaults::unavailable_keywords")]
    pub unavailable: Vec<String>,

    /// Labels of clickable purchase controls
    #[serde(default = "defaults::purchase_controls")]
    pub purchase_controls: Vec<String>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            available: defaults::available_keywords(),
            unavailable: defaults::unavailable_keywords(),
            purchase_controls: defaults::purchase_controls(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Fetcher defaults
    pub fn timeout() -> f64 {
        15.0
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
         Chrome/124.0.0.0 Safari/537.36"
            .into()
    }
    pub fn max_redirects() -> usize {
        10
    }

    // Scheduler defaults
    pub fn interval_minutes() -> u64 {
        180
    }
    pub fn first_run_delay() -> u64 {
        60
    }

    // Storage defaults
    pub fn subscriptions_path() -> PathBuf {
        PathBuf::from("data/subscriptions.json")
    }

    // Keyword defaults
    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }
    pub fn available_keywords() -> Vec<String> {
        strings(&[
            "available",
            "in stock",
            "add to cart",
            "buy now",
            "доступно",
            "в наявності",
            "в наличии",
            "доступен",
            "dodaj do koszyka",
            "kup teraz",
        ])
    }
    pub fn unavailable_keywords() -> Vec<String> {
        strings(&[
            "out of stock",
            "not available",
            "sold out",
            "unavailable",
            "немає в наявності",
            "нет в наличии",
            "brak w magazynie",
            "niedostępny",
            "preorder",
        ])
    }
    pub fn purchase_controls() -> Vec<String> {
        strings(&[
            "add to cart",
            "buy now",
            "в кошик",
            "у кошик",
            "купити",
            "в корзину",
            "додати до кошика",
            "додати в кошик",
            "dodaj do koszyka",
            "kup teraz",
        ])
    }
}
