use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use hourwatch_core::{
    detect, AppConfig, Detection, EvaluationContext, Evaluator, HoursModel, MismatchAlert,
    MonitoredLocation, Observation, RawHours, StatusRecord,
};
use hourwatch_scraper::ListingSource;
use serde::Serialize;

use crate::notify::Notifier;
use crate::store::{StatusStore, StoreError};

const DEFAULT_MAX_CONCURRENT: usize = 2;
const DEFAULT_PERSIST_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_PERSIST_RETRY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub locations: Vec<MonitoredLocation>,
    pub evaluator: Evaluator,
    pub max_concurrent: usize,
    /// Total tries per record, including the first.
    pub persist_max_attempts: u32,
    /// Multiplied by the attempt number before each retry.
    pub persist_retry_delay: Duration,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            locations: Vec::new(),
            evaluator: Evaluator::default(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            persist_max_attempts: DEFAULT_PERSIST_MAX_ATTEMPTS,
            persist_retry_delay: DEFAULT_PERSIST_RETRY_DELAY,
        }
    }
}

impl MonitorSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig, locations: Vec<MonitoredLocation>) -> Self {
        Self {
            locations,
            evaluator: Evaluator::new(config.fallback_window),
            max_concurrent: config.scraper_max_concurrent_locations,
            persist_max_attempts: config.persist_max_attempts,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Fetch,
    Persist,
}

/// A location that produced no record this cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationFailure {
    pub location_id: String,
    pub url: String,
    pub stage: FailureStage,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    /// Persisted records, in locations-file order.
    pub records: Vec<StatusRecord>,
    pub failures: Vec<LocationFailure>,
    pub alerts_sent: usize,
    pub alerts_failed: usize,
}

impl CycleReport {
    #[must_use]
    pub fn mismatches(&self) -> usize {
        self.records.iter().filter(|r| r.mismatch()).count()
    }
}

/// Drives check cycles over the configured locations.
pub struct Monitor<S, P, N> {
    source: S,
    store: P,
    notifier: N,
    settings: MonitorSettings,
}

impl<S, P, N> Monitor<S, P, N>
where
    S: ListingSource,
    P: StatusStore,
    N: Notifier,
{
    pub fn new(source: S, store: P, notifier: N, settings: MonitorSettings) -> Self {
        Self {
            source,
            store,
            notifier,
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    #[must_use]
    pub fn store(&self) -> &P {
        &self.store
    }

    /// Runs one cycle with every location evaluated against `now`.
    ///
    /// Locations are checked concurrently, bounded by `max_concurrent`. A
    /// location whose fetch fails or whose record cannot be persisted is
    /// reported in `failures` and raises no alert. Alerts go out only after
    /// every record has been persisted, once per mismatching record.
    pub async fn run_cycle(&self, now: DateTime<Utc>) -> CycleReport {
        let max_concurrent = self.settings.max_concurrent.max(1);

        let mut outcomes: Vec<(usize, Result<Detection, LocationFailure>)> =
            stream::iter(0..self.settings.locations.len())
                .map(|index| async move {
                    let location = &self.settings.locations[index];
                    (index, self.check_location(location, now).await)
                })
                .buffer_unordered(max_concurrent)
                .collect()
                .await;
        outcomes.sort_by_key(|(index, _)| *index);

        let mut records = Vec::with_capacity(outcomes.len());
        let mut alerts: Vec<MismatchAlert> = Vec::new();
        let mut failures = Vec::new();
        for (_, outcome) in outcomes {
            match outcome {
                Ok(Detection { record, alert }) => {
                    records.push(record);
                    alerts.extend(alert);
                }
                Err(failure) => failures.push(failure),
            }
        }

        let mut alerts_sent = 0usize;
        let mut alerts_failed = 0usize;
        for alert in &alerts {
            match self.notifier.notify(alert).await {
                Ok(()) => alerts_sent += 1,
                Err(e) => {
                    alerts_failed += 1;
                    tracing::error!(
                        restaurant = %alert.name,
                        error = %e,
                        "failed to deliver mismatch alert"
                    );
                }
            }
        }

        tracing::info!(
            locations = self.settings.locations.len(),
            records = records.len(),
            failures = failures.len(),
            alerts_sent,
            alerts_failed,
            "check cycle complete"
        );

        CycleReport {
            started_at: now,
            records,
            failures,
            alerts_sent,
            alerts_failed,
        }
    }

    async fn check_location(
        &self,
        location: &MonitoredLocation,
        now: DateTime<Utc>,
    ) -> Result<Detection, LocationFailure> {
        let failure = |stage: FailureStage, error: String| LocationFailure {
            location_id: location.id.clone(),
            url: location.url.clone(),
            stage,
            error,
        };

        let listing = match self.source.fetch_listing(&location.url).await {
            Ok(listing) => listing,
            Err(e) => {
                tracing::error!(location = %location.id, error = %e, "listing fetch failed");
                return Err(failure(FailureStage::Fetch, e.to_string()));
            }
        };

        let model = HoursModel::from_optional(listing.opening_hours.as_ref());
        let ctx = EvaluationContext::new(now, location.timezone);
        let expectation = self.settings.evaluator.explain(&model, &ctx);

        let observation = Observation {
            location_id: location.id.clone(),
            name: location.display_name(&listing),
            address: listing.address.clone(),
            hours_raw: listing.opening_hours.as_ref().map(RawHours::display),
            actual: listing.actual_open,
            source_url: listing.source_url.clone(),
        };
        let detection = detect(observation, expectation.open, now, location.timezone);

        tracing::info!(
            location = %location.id,
            expected = expectation.open,
            actual = listing.actual_open,
            mismatch = detection.record.mismatch(),
            basis = %expectation.basis,
            "location checked"
        );

        if let Err(e) = self.persist(&detection.record).await {
            tracing::error!(location = %location.id, error = %e, "status record not persisted");
            return Err(failure(FailureStage::Persist, e.to_string()));
        }

        Ok(detection)
    }

    async fn persist(&self, record: &StatusRecord) -> Result<(), StoreError> {
        let max_attempts = self.settings.persist_max_attempts.max(1);
        let mut attempt = 1u32;
        loop {
            match self.store.upsert(record).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt >= max_attempts => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        location = %record.location_id(),
                        attempt,
                        max_attempts,
                        error = %e,
                        "status upsert failed, retrying"
                    );
                    tokio::time::sleep(self.settings.persist_retry_delay * attempt).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "monitor_test.rs"]
mod tests;
