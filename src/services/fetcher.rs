// src/services/fetcher.rs

//! Page fetching.
//!
//! The classifier only needs "HTML for a URL, plus where the redirects ended".
//! `Fetcher` is that contract; `HttpFetcher` implements it with reqwest.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::USER_AGENT;

use crate::error::{FetchError, Result};
use crate::models::FetcherConfig;
use crate::utils::http::create_async_client;

/// A fetched document and the URL it was finally served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub final_url: String,
    pub html: String,
}

/// Retrieves raw HTML for a URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> std::result::Result<FetchedPage, FetchError>;
}

/// Plain HTTP fetcher. Follows redirects, rejects non-2xx responses.
pub struct HttpFetcher {
    client: Client,
    user_agents: Vec<String>,
    next_agent: AtomicUsize,
}

impl HttpFetcher {
    /// Build a fetcher with the configured timeout, redirects and identity.
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let user_agents = if config.user_agents.is_empty() {
            vec![config.user_agent.clone()]
        } else {
            config.user_agents.clone()
        };

        Ok(Self {
            client: create_async_client(config)?,
            user_agents,
            next_agent: AtomicUsize::new(0),
        })
    }

    /// Next identity from the pool, round-robin.
    fn user_agent(&self) -> &str {
        let idx = self.next_agent.fetch_add(1, Ordering::Relaxed);
        &self.user_agents[idx % self.user_agents.len()]
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<FetchedPage, FetchError> {
        let agent = self.user_agent().to_string();
        log::debug!("Fetching {} as '{}'", url, agent);

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, agent)
            .send()
            .await
            .map_err(|e| FetchError::new(url, describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(url, format!("HTTP status {status}")));
        }

        let final_url = response.url().to_string();
        let html = response
            .text()
            .await
            .map_err(|e| FetchError::new(url, describe(&e)))?;

        Ok(FetchedPage { final_url, html })
    }
}

/// Short diagnostic for a reqwest failure.
fn describe(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_redirect() {
        "too many redirects".to_string()
    } else if error.is_connect() {
        format!("connection failed: {error}")
    } else {
        error.to_string()
    }
}
