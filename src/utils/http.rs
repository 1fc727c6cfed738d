// src/utils/http.rs

//! HTTP client utilities.

use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use reqwest::redirect::Policy;

use crate::error::{AppError, Result};
use crate::models::FetcherConfig;

/// Create a configured asynchronous HTTP client.
///
/// The user agent is left to each request so a pool can be rotated.
pub fn create_async_client(config: &FetcherConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    if let Some(lang) = &config.accept_language {
        let value = HeaderValue::from_str(lang)
            .map_err(|e| AppError::config(format!("fetcher.accept_language: {e}")))?;
        headers.insert(ACCEPT_LANGUAGE, value);
    }

    let client = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(config.timeout())
        .redirect(Policy::limited(config.max_redirects))
        .build()?;
    Ok(client)
}
