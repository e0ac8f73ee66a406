use chrono_tz::Tz;

use crate::app_config::{AppConfig, Environment};
use crate::interval::{parse_range, Interval};
use crate::{ConfigError, DEFAULT_FALLBACK_HOURS, DEFAULT_TIMEZONE};

pub(crate) const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub(crate) const DEFAULT_CHECK_SCHEDULE: &str = "0 */15 * * * *";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("HOURWATCH_ENV", "development"))?;

    let bind_addr = or_default("HOURWATCH_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("HOURWATCH_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("HOURWATCH_LOG_LEVEL", "info");
    let locations_path = PathBuf::from(or_default(
        "HOURWATCH_LOCATIONS_PATH",
        "./config/locations.yaml",
    ));

    let default_timezone = parse_timezone(&or_default("HOURWATCH_DEFAULT_TIMEZONE", DEFAULT_TIMEZONE))
        .map_err(|reason| invalid("HOURWATCH_DEFAULT_TIMEZONE", reason))?;
    let fallback_window = parse_fallback(&or_default("HOURWATCH_FALLBACK_HOURS", DEFAULT_FALLBACK_HOURS))
        .map_err(|reason| invalid("HOURWATCH_FALLBACK_HOURS", reason))?;
    let check_schedule = validate_cron(&or_default("HOURWATCH_CHECK_SCHEDULE", DEFAULT_CHECK_SCHEDULE))
        .map_err(|reason| invalid("HOURWATCH_CHECK_SCHEDULE", reason))?;
    let slack_webhook_url = lookup("HOURWATCH_SLACK_WEBHOOK_URL")
        .ok()
        .filter(|url| !url.trim().is_empty());

    let db_max_connections = parse_u32("HOURWATCH_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("HOURWATCH_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("HOURWATCH_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let scraper_request_timeout_secs = parse_u64("HOURWATCH_SCRAPER_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_user_agent = or_default("HOURWATCH_SCRAPER_USER_AGENT", DEFAULT_USER_AGENT);
    let scraper_max_concurrent_locations =
        parse_usize("HOURWATCH_SCRAPER_MAX_CONCURRENT_LOCATIONS", "2")?;
    if scraper_max_concurrent_locations == 0 {
        return Err(invalid(
            "HOURWATCH_SCRAPER_MAX_CONCURRENT_LOCATIONS",
            "must be at least 1".to_string(),
        ));
    }
    let scraper_max_retries = parse_u32("HOURWATCH_SCRAPER_MAX_RETRIES", "2")?;
    let scraper_retry_backoff_base_ms = parse_u64("HOURWATCH_SCRAPER_RETRY_BACKOFF_BASE_MS", "2000")?;

    let persist_max_attempts = parse_u32("HOURWATCH_PERSIST_MAX_ATTEMPTS", "3")?;
    if persist_max_attempts == 0 {
        return Err(invalid(
            "HOURWATCH_PERSIST_MAX_ATTEMPTS",
            "must be at least 1".to_string(),
        ));
    }

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        locations_path,
        default_timezone,
        fallback_window,
        check_schedule,
        slack_webhook_url,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_max_concurrent_locations,
        scraper_max_retries,
        scraper_retry_backoff_base_ms,
        persist_max_attempts,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "HOURWATCH_ENV".to_string(),
            reason: format!("unknown environment '{other}'; expected development, test, or production"),
        }),
    }
}

/// Parses an IANA zone name such as `Asia/Kolkata`.
pub(crate) fn parse_timezone(name: &str) -> Result<Tz, String> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| format!("unknown IANA timezone '{name}'"))
}

fn parse_fallback(raw: &str) -> Result<Interval, String> {
    parse_range(raw.trim()).map_err(|e| e.to_string())
}

fn validate_cron(raw: &str) -> Result<String, String> {
    let expr = raw.trim();
    let fields = expr.split_whitespace().count();
    if (6..=7).contains(&fields) {
        Ok(expr.to_string())
    } else {
        Err(format!(
            "expected 6 or 7 whitespace-separated cron fields (seconds first), got {fields}"
        ))
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
