//! Comparing expected and observed status.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

/// Outcome of comparing an expected status against an observed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MismatchOutcome {
    pub mismatch: bool,
}

#[must_use]
pub fn evaluate_mismatch(expected: bool, actual: bool) -> MismatchOutcome {
    MismatchOutcome {
        mismatch: expected != actual,
    }
}

/// `"OPEN"` or `"CLOSED"`.
#[must_use]
pub fn status_label(open: bool) -> &'static str {
    if open {
        "OPEN"
    } else {
        "CLOSED"
    }
}

/// What was scraped for one location, before the expectation is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub location_id: String,
    pub name: String,
    pub address: String,
    pub hours_raw: Option<String>,
    pub actual: bool,
    pub source_url: String,
}

/// One location's state for a cycle.
///
/// `mismatch` is derived in [`StatusRecord::new`] and has no setter, so it
/// always equals `expected != actual`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRecord {
    location_id: String,
    name: String,
    address: String,
    hours_raw: Option<String>,
    expected: bool,
    actual: bool,
    mismatch: bool,
    observed_at: DateTime<Utc>,
    source_url: String,
}

impl StatusRecord {
    #[must_use]
    pub fn new(observation: Observation, expected: bool, observed_at: DateTime<Utc>) -> Self {
        let Observation {
            location_id,
            name,
            address,
            hours_raw,
            actual,
            source_url,
        } = observation;

        Self {
            location_id,
            name,
            address,
            hours_raw,
            expected,
            actual,
            mismatch: evaluate_mismatch(expected, actual).mismatch,
            observed_at,
            source_url,
        }
    }

    #[must_use]
    pub fn location_id(&self) -> &str {
        &self.location_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    #[must_use]
    pub fn hours_raw(&self) -> Option<&str> {
        self.hours_raw.as_deref()
    }

    #[must_use]
    pub fn expected(&self) -> bool {
        self.expected
    }

    #[must_use]
    pub fn actual(&self) -> bool {
        self.actual
    }

    #[must_use]
    pub fn mismatch(&self) -> bool {
        self.mismatch
    }

    #[must_use]
    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }

    #[must_use]
    pub fn source_url(&self) -> &str {
        &self.source_url
    }
}

/// Operator-facing payload for a mismatching record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MismatchAlert {
    pub name: String,
    pub expected: &'static str,
    pub actual: &'static str,
    pub address: String,
    pub observed_at: DateTime<Utc>,
    /// `observed_at` rendered in the location's zone, with its abbreviation.
    pub local_time: String,
}

impl MismatchAlert {
    /// Builds the alert for `record`, or `None` when it does not mismatch.
    #[must_use]
    pub fn for_record(record: &StatusRecord, timezone: Tz) -> Option<Self> {
        if !record.mismatch() {
            return None;
        }

        Some(Self {
            name: record.name().to_owned(),
            expected: status_label(record.expected()),
            actual: status_label(record.actual()),
            address: record.address().to_owned(),
            observed_at: record.observed_at(),
            local_time: record
                .observed_at()
                .with_timezone(&timezone)
                .format("%Y-%m-%d %H:%M:%S %Z")
                .to_string(),
        })
    }

    #[must_use]
    pub fn text(&self) -> String {
        format!(
            "⚠️ Mismatch detected!\nRestaurant: {}\nExpected: {}\nActual: {}\nAddress: {}\nTime: {}",
            self.name, self.expected, self.actual, self.address, self.local_time
        )
    }
}

/// A record plus the alert it raises, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub record: StatusRecord,
    pub alert: Option<MismatchAlert>,
}

#[must_use]
pub fn detect(
    observation: Observation,
    expected: bool,
    observed_at: DateTime<Utc>,
    timezone: Tz,
) -> Detection {
    let record = StatusRecord::new(observation, expected, observed_at);
    let alert = MismatchAlert::for_record(&record, timezone);
    Detection { record, alert }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono_tz::Asia::Kolkata;

    use super::*;

    fn observation(actual: bool) -> Observation {
        Observation {
            location_id: "bk-koramangala".to_string(),
            name: "Swiggy - Burger King".to_string(),
            address: "80 Feet Road, Koramangala".to_string(),
            hours_raw: Some("11 AM to 11 PM".to_string()),
            actual,
            source_url: "https://www.swiggy.com/restaurants/burger-king-koramangala-5934/dineout"
                .to_string(),
        }
    }

    fn noon_utc() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).single().expect("valid")
    }

    #[test]
    fn mismatch_is_inequality() {
        for expected in [false, true] {
            for actual in [false, true] {
                assert_eq!(
                    evaluate_mismatch(expected, actual).mismatch,
                    expected != actual
                );
                let record = StatusRecord::new(observation(actual), expected, noon_utc());
                assert_eq!(record.mismatch(), expected != actual);
            }
        }
    }

    #[test]
    fn agreement_raises_no_alert() {
        let detection = detect(observation(true), true, noon_utc(), Kolkata);
        assert!(!detection.record.mismatch());
        assert!(detection.alert.is_none());
    }

    #[test]
    fn alert_text_uses_location_zone() {
        let detection = detect(observation(false), true, noon_utc(), Kolkata);
        let alert = detection.alert.expect("mismatch raises an alert");
        assert_eq!(
            alert.text(),
            "⚠️ Mismatch detected!\n\
             Restaurant: Swiggy - Burger King\n\
             Expected: OPEN\n\
             Actual: CLOSED\n\
             Address: 80 Feet Road, Koramangala\n\
             Time: 2024-01-01 17:30:00 IST"
        );
    }

    #[test]
    fn labels() {
        assert_eq!(status_label(true), "OPEN");
        assert_eq!(status_label(false), "CLOSED");
    }
}
