use std::net::SocketAddr;
use std::path::PathBuf;

use chrono_tz::Tz;

use crate::interval::Interval;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub locations_path: PathBuf,
    pub default_timezone: Tz,
    /// Window applied when a listing publishes hours only as free text.
    pub fallback_window: Interval,
    /// Six- or seven-field cron expression for scheduled checks.
    pub check_schedule: String,
    pub slack_webhook_url: Option<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub scraper_max_concurrent_locations: usize,
    pub scraper_max_retries: u32,
    pub scraper_retry_backoff_base_ms: u64,
    pub persist_max_attempts: u32,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("locations_path", &self.locations_path)
            .field("database_url", &"[redacted]")
            .field("default_timezone", &self.default_timezone)
            .field("fallback_window", &self.fallback_window.to_string())
            .field("check_schedule", &self.check_schedule)
            .field(
                "slack_webhook_url",
                &self.slack_webhook_url.as_ref().map(|_| "[redacted]"),
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "scraper_request_timeout_secs",
                &self.scraper_request_timeout_secs,
            )
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field(
                "scraper_max_concurrent_locations",
                &self.scraper_max_concurrent_locations,
            )
            .field("scraper_max_retries", &self.scraper_max_retries)
            .field(
                "scraper_retry_backoff_base_ms",
                &self.scraper_retry_backoff_base_ms,
            )
            .field("persist_max_attempts", &self.persist_max_attempts)
            .finish()
    }
}
