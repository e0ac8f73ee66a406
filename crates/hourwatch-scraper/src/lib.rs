//! Listing sources: where the observed open/closed status comes from.

pub mod client;
pub mod error;
pub mod page;
pub(crate) mod retry;
pub mod source;

pub use client::HttpListingSource;
pub use error::ScraperError;
pub use page::parse_listing_page;
pub use source::ListingSource;
