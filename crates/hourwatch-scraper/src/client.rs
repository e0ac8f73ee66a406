//! HTTP listing source backed by `reqwest`.

use std::time::Duration;

use hourwatch_core::ScrapedListing;
use reqwest::Client;

use crate::error::ScraperError;
use crate::page::parse_listing_page;
use crate::retry::retry_with_backoff;
use crate::source::ListingSource;

/// Fetches listing pages over HTTP and reads them with [`parse_listing_page`].
///
/// Transient errors (network failures, 429, 5xx) are retried with
/// exponential backoff and jitter up to `max_retries` additional attempts.
/// 404 and other client errors fail immediately.
#[derive(Debug, Clone)]
pub struct HttpListingSource {
    client: Client,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl HttpListingSource {
    /// Creates a source with the given timeout, `User-Agent`, and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_ms,
        })
    }

    async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-IN,en;q=0.9")
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok());
            return Err(ScraperError::RateLimited {
                url: url.to_owned(),
                retry_after_secs,
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response.text().await?)
    }
}

impl ListingSource for HttpListingSource {
    async fn fetch_listing(&self, url: &str) -> Result<ScrapedListing, ScraperError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| ScraperError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ScraperError::InvalidUrl {
                url: url.to_owned(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let html = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.fetch_page(url)
        })
        .await?;

        let listing = parse_listing_page(&html, url)?;
        tracing::debug!(
            url,
            name = %listing.name,
            actual_open = listing.actual_open,
            "listing page parsed"
        );
        Ok(listing)
    }
}
