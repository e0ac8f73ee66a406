use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// `retry_after_secs` is the server's `Retry-After`, when it sent one.
    #[error("rate limited by {url}")]
    RateLimited {
        url: String,
        retry_after_secs: Option<u64>,
    },

    #[error("listing not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("no open/closed status signal on listing page {url}")]
    StatusUnavailable { url: String },

    #[error("invalid listing URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}
