//! Expected-status evaluation for restaurant listings.
//!
//! The evaluator answers one question: given the published opening hours of a
//! location and an instant in that location's timezone, should it be open?
//! Everything here is pure and synchronous; fetching, persistence, and
//! notification live in the sibling crates.

pub mod app_config;
pub mod config;
pub mod evaluator;
pub mod hours;
pub mod interval;
pub mod listing;
pub mod locations;
pub mod mismatch;
pub mod time;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use evaluator::{
    expected, Basis, EvaluationContext, Evaluator, Expectation, DEFAULT_FALLBACK_WINDOW,
};
pub use hours::{normalize, parse_weekday, HoursModel, RawHours, WeeklySchedule};
pub use interval::{is_open, Interval};
pub use listing::ScrapedListing;
pub use locations::{load_locations, parse_locations, LocationConfig, LocationsFile, MonitoredLocation};
pub use mismatch::{
    detect, evaluate_mismatch, status_label, Detection, MismatchAlert, MismatchOutcome,
    Observation, StatusRecord,
};
pub use time::{parse_time, ParseError, TimeOfDay};

/// Zone used for locations that do not declare their own.
pub const DEFAULT_TIMEZONE: &str = "Asia/Kolkata";

/// Fallback window applied to free-text hours, in `"open - close"` form.
pub const DEFAULT_FALLBACK_HOURS: &str = "11:00 - 23:00";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read locations file {path}: {source}")]
    LocationsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse locations file: {0}")]
    LocationsFileParse(#[source] serde_yaml::Error),

    #[error("locations validation error: {0}")]
    Validation(String),
}
