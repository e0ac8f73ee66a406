//! Production wiring: HTTP listings, Postgres store, configured notifier.

use hourwatch_core::{load_locations, AppConfig, ConfigError, MonitoredLocation};
use hourwatch_scraper::{HttpListingSource, ScraperError};
use sqlx::PgPool;
use thiserror::Error;

use crate::monitor::{Monitor, MonitorSettings};
use crate::notify::{AlertNotifier, NotifyError};
use crate::store::PgStatusStore;

pub type LiveMonitor = Monitor<HttpListingSource, PgStatusStore, AlertNotifier>;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build listing client: {0}")]
    Scraper(#[from] ScraperError),
    #[error("failed to build notifier: {0}")]
    Notifier(#[from] NotifyError),
}

/// Loads the locations file named by `config` and resolves each zone.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file is missing, malformed, or invalid.
pub fn load_monitored_locations(config: &AppConfig) -> Result<Vec<MonitoredLocation>, ConfigError> {
    load_locations(&config.locations_path)?.resolve(config.default_timezone)
}

/// Builds the HTTP listing source described by `config`.
///
/// # Errors
///
/// Returns [`ScraperError::Http`] if the client cannot be constructed.
pub fn listing_source(config: &AppConfig) -> Result<HttpListingSource, ScraperError> {
    HttpListingSource::new(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
        config.scraper_max_retries,
        config.scraper_retry_backoff_base_ms,
    )
}

/// Builds the monitor used by the server and the CLI `check` command.
///
/// # Errors
///
/// Returns [`BuildError`] if the listing client or notifier cannot be built.
pub fn build_live_monitor(
    config: &AppConfig,
    pool: PgPool,
    locations: Vec<MonitoredLocation>,
) -> Result<LiveMonitor, BuildError> {
    let source = listing_source(config)?;
    let notifier = AlertNotifier::from_webhook_url(
        config.slack_webhook_url.as_deref(),
        config.scraper_request_timeout_secs,
    )?;
    tracing::info!(
        locations = locations.len(),
        notifier = notifier.kind(),
        "check pipeline configured"
    );

    Ok(Monitor::new(
        source,
        PgStatusStore::new(pool),
        notifier,
        MonitorSettings::from_app_config(config, locations),
    ))
}
