use serde::{Deserialize, Serialize};

use crate::hours::RawHours;

/// What a listing source reports for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedListing {
    pub name: String,
    pub address: String,
    pub opening_hours: Option<RawHours>,
    pub actual_open: bool,
    pub source_url: String,
}
