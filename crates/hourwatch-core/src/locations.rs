use std::collections::HashSet;
use std::path::Path;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::config::parse_timezone;
use crate::listing::ScrapedListing;
use crate::ConfigError;

/// One monitored listing as declared in `locations.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Slug stored as the record's `location_id`.
    pub id: String,
    pub url: String,
    /// IANA zone; the configured default applies when absent.
    pub timezone: Option<String>,
    /// Platform label, stored as a `"<label> - "` prefix on the scraped name.
    pub label: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LocationsFile {
    pub locations: Vec<LocationConfig>,
}

/// A location with its zone resolved, ready for a check cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitoredLocation {
    pub id: String,
    pub url: String,
    pub timezone: Tz,
    pub label: Option<String>,
}

impl MonitoredLocation {
    /// Name stored for a scraped listing, prefixed with the platform label.
    #[must_use]
    pub fn display_name(&self, scraped: &ScrapedListing) -> String {
        match &self.label {
            Some(label) => format!("{label} - {}", scraped.name),
            None => scraped.name.clone(),
        }
    }
}

impl LocationsFile {
    /// Resolves every location's timezone against `default_timezone`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if a declared zone is unknown.
    pub fn resolve(&self, default_timezone: Tz) -> Result<Vec<MonitoredLocation>, ConfigError> {
        self.locations
            .iter()
            .map(|loc| {
                let timezone = match loc.timezone.as_deref() {
                    Some(name) => parse_timezone(name).map_err(|reason| {
                        ConfigError::Validation(format!("location '{}': {reason}", loc.id))
                    })?,
                    None => default_timezone,
                };
                Ok(MonitoredLocation {
                    id: loc.id.clone(),
                    url: loc.url.clone(),
                    timezone,
                    label: loc.label.clone(),
                })
            })
            .collect()
    }
}

/// Load and validate the locations list from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_locations(path: &Path) -> Result<LocationsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LocationsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_locations(&content)
}

/// Parse and validate a locations document already in memory.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_locations(content: &str) -> Result<LocationsFile, ConfigError> {
    let file: LocationsFile =
        serde_yaml::from_str(content).map_err(ConfigError::LocationsFileParse)?;

    validate_locations(&file)?;

    Ok(file)
}

fn validate_locations(file: &LocationsFile) -> Result<(), ConfigError> {
    if file.locations.is_empty() {
        return Err(ConfigError::Validation(
            "at least one location must be configured".to_string(),
        ));
    }

    let mut seen_ids = HashSet::new();
    let mut seen_urls = HashSet::new();

    for location in &file.locations {
        if !is_slug(&location.id) {
            return Err(ConfigError::Validation(format!(
                "location id '{}' must be a non-empty slug of lowercase letters, digits, and '-'",
                location.id
            )));
        }

        if !seen_ids.insert(location.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate location id: '{}'",
                location.id
            )));
        }

        let url = location.url.trim();
        if url.is_empty() {
            return Err(ConfigError::Validation(format!(
                "location '{}' has an empty url",
                location.id
            )));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "location '{}' url must start with http:// or https://",
                location.id
            )));
        }
        if !seen_urls.insert(url) {
            return Err(ConfigError::Validation(format!(
                "duplicate location url: '{url}' (from location '{}')",
                location.id
            )));
        }

        if let Some(tz) = location.timezone.as_deref() {
            parse_timezone(tz).map_err(|reason| {
                ConfigError::Validation(format!("location '{}': {reason}", location.id))
            })?;
        }

        if location.label.as_deref().is_some_and(|l| l.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "location '{}' has an empty label",
                location.id
            )));
        }
    }

    Ok(())
}

fn is_slug(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('-')
        && !id.ends_with('-')
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
#[path = "locations_test.rs"]
mod tests;
