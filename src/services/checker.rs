// src/services/checker.rs

//! Fetch-and-classify for a single URL.

use crate::error::FetchError;
use crate::models::CheckResult;
use crate::services::{Classifier, Fetcher};

/// Combines a [`Fetcher`] with a [`Classifier`].
pub struct AvailabilityChecker<F> {
    fetcher: F,
    classifier: Classifier,
}

impl<F: Fetcher> AvailabilityChecker<F> {
    pub fn new(fetcher: F, classifier: Classifier) -> Self {
        Self {
            fetcher,
            classifier,
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Fetch and classify, surfacing a failed fetch to the caller.
    pub async fn try_check(
        &self,
        url: &str,
        css: Option<&str>,
    ) -> Result<CheckResult, FetchError> {
        let page = self.fetcher.fetch(url).await?;
        let result = self
            .classifier
            .classify(&page.html, css)
            .with_url(page.final_url);
        log::debug!("{} -> {} ({})", url, result.status, result.reason);
        Ok(result)
    }

    /// Fetch and classify; a failed fetch becomes an `UNKNOWN` verdict.
    pub async fn check(&self, url: &str, css: Option<&str>) -> CheckResult {
        match self.try_check(url, css).await {
            Ok(result) => result,
            Err(e) => {
                log::warn!("{}", e);
                CheckResult::unknown(format!("Request failed: {}", e.message)).with_url(url)
            }
        }
    }
}
