use std::future::Future;

use hourwatch_core::ScrapedListing;

use crate::error::ScraperError;

/// Anything that can report a listing's published hours and live status.
pub trait ListingSource: Send + Sync {
    /// Fetches the listing at `url`.
    ///
    /// Implementations must report [`ScraperError::StatusUnavailable`] rather
    /// than guess when the live status cannot be read.
    fn fetch_listing(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<ScrapedListing, ScraperError>> + Send;
}
