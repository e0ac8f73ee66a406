//! Expected open/closed status from a [`HoursModel`] and an instant.
//!
//! The decision table:
//!
//! | model            | result                                   |
//! |------------------|------------------------------------------|
//! | `Unknown`        | closed                                   |
//! | `Weekly`, no day | closed                                   |
//! | `Weekly`, day    | membership in that day's interval        |
//! | `FreeText`       | membership in the fallback window        |
//!
//! The fallback window is a deliberately coarse stand-in for hours that could
//! not be structured. It says nothing about the real schedule.

use std::fmt;

use chrono::{DateTime, Datelike, LocalResult, NaiveDateTime, TimeZone, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use serde::Serialize;

use crate::hours::{day_name, HoursModel};
use crate::interval::{is_open, Interval};
use crate::time::TimeOfDay;

/// 11:00 to 23:00 local, applied to free-text hours.
pub const DEFAULT_FALLBACK_WINDOW: Interval =
    Interval::new(TimeOfDay::from_hm(11, 0), TimeOfDay::from_hm(23, 0));

/// The instant being evaluated and the zone it is read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationContext {
    pub now: DateTime<Utc>,
    pub timezone: Tz,
}

impl EvaluationContext {
    #[must_use]
    pub const fn new(now: DateTime<Utc>, timezone: Tz) -> Self {
        Self { now, timezone }
    }

    /// Builds a context from a local wall-clock time in `timezone`.
    ///
    /// Returns `None` when the wall-clock time does not exist in that zone
    /// (a DST gap). Ambiguous times resolve to the earlier instant.
    #[must_use]
    pub fn at_local(local: NaiveDateTime, timezone: Tz) -> Option<Self> {
        let instant = match timezone.from_local_datetime(&local) {
            LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => t,
            LocalResult::None => return None,
        };
        Some(Self::new(instant.with_timezone(&Utc), timezone))
    }

    #[must_use]
    pub fn local(&self) -> DateTime<Tz> {
        self.now.with_timezone(&self.timezone)
    }

    /// Weekday and minute-of-day, both taken from one conversion of `now`.
    #[must_use]
    pub fn local_day_and_minute(&self) -> (Weekday, TimeOfDay) {
        let local = self.local();
        let minute = TimeOfDay::from_hm(local.hour(), local.minute());
        (local.weekday(), minute)
    }
}

/// Which branch of the decision table produced an expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Basis {
    Unknown,
    MissingDay {
        #[serde(serialize_with = "serialize_weekday")]
        day: Weekday,
    },
    Schedule {
        #[serde(serialize_with = "serialize_weekday")]
        day: Weekday,
        interval: Interval,
    },
    FallbackWindow {
        interval: Interval,
    },
}

fn serialize_weekday<S: serde::Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(day_name(*day))
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => f.write_str("no usable hours"),
            Self::MissingDay { day } => write!(f, "no hours listed for {}", day_name(*day)),
            Self::Schedule { day, interval } => {
                write!(f, "{} schedule {interval}", day_name(*day))
            }
            Self::FallbackWindow { interval } => write!(f, "fallback window {interval}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Expectation {
    pub open: bool,
    pub basis: Basis,
}

/// Evaluates hours against a context using a configurable fallback window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluator {
    fallback: Interval,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(DEFAULT_FALLBACK_WINDOW)
    }
}

impl Evaluator {
    #[must_use]
    pub const fn new(fallback: Interval) -> Self {
        Self { fallback }
    }

    #[must_use]
    pub const fn fallback(&self) -> Interval {
        self.fallback
    }

    #[must_use]
    pub fn explain(&self, model: &HoursModel, ctx: &EvaluationContext) -> Expectation {
        let (day, minute) = ctx.local_day_and_minute();
        match model {
            HoursModel::Unknown => Expectation {
                open: false,
                basis: Basis::Unknown,
            },
            HoursModel::Weekly(schedule) => match schedule.get(day) {
                Some(interval) => Expectation {
                    open: is_open(&interval, minute),
                    basis: Basis::Schedule { day, interval },
                },
                None => Expectation {
                    open: false,
                    basis: Basis::MissingDay { day },
                },
            },
            HoursModel::FreeText(_) => Expectation {
                open: is_open(&self.fallback, minute),
                basis: Basis::FallbackWindow {
                    interval: self.fallback,
                },
            },
        }
    }

    #[must_use]
    pub fn expected(&self, model: &HoursModel, ctx: &EvaluationContext) -> bool {
        self.explain(model, ctx).open
    }
}

/// Expected status using the default 11:00 to 23:00 fallback window.
#[must_use]
pub fn expected(model: &HoursModel, ctx: &EvaluationContext) -> bool {
    Evaluator::default().expected(model, ctx)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;
    use chrono_tz::Asia::Kolkata;
    use chrono_tz::UTC;

    use super::*;
    use crate::hours::{normalize, RawHours};

    fn monday_at(hour: u32, minute: u32) -> EvaluationContext {
        let local = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .expect("valid date");
        EvaluationContext::at_local(local, Kolkata).expect("kolkata has no DST gap")
    }

    fn tuesday_at(hour: u32, minute: u32) -> EvaluationContext {
        let local = NaiveDate::from_ymd_opt(2024, 1, 2)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .expect("valid date");
        EvaluationContext::at_local(local, Kolkata).expect("kolkata has no DST gap")
    }

    fn mapping(entries: &[(&str, &str)]) -> HoursModel {
        let map: BTreeMap<String, String> = entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        normalize(&RawHours::Mapping(map))
    }

    #[test]
    fn unknown_is_closed() {
        for (h, m) in [(0, 0), (12, 0), (20, 30)] {
            let ctx = monday_at(h, m);
            assert!(!expected(&HoursModel::Unknown, &ctx));
            assert_eq!(
                Evaluator::default().explain(&HoursModel::Unknown, &ctx).basis,
                Basis::Unknown
            );
        }
    }

    #[test]
    fn monday_schedule_scenario() {
        let model = mapping(&[
            ("Monday", "11:00AM - 11:59PM"),
            ("Tuesday", "11:00AM - 11:59PM"),
        ]);

        assert!(expected(&model, &monday_at(13, 30)));
        // Close is exclusive: 23:59 is minute 1439, outside [660, 1439).
        assert!(!expected(&model, &monday_at(23, 59)));
        // Monday's own interval at minute 30, before the 11:00 opening.
        assert!(!expected(&model, &monday_at(0, 30)));
        // 00:30 on Tuesday falls before Tuesday's 11:00 opening.
        assert!(!expected(&model, &tuesday_at(0, 30)));
    }

    #[test]
    fn missing_day_is_closed() {
        let model = mapping(&[("Tuesday", "11:00AM - 11:59PM")]);
        let expectation = Evaluator::default().explain(&model, &monday_at(13, 30));
        assert!(!expectation.open);
        assert_eq!(expectation.basis, Basis::MissingDay { day: Weekday::Mon });
    }

    #[test]
    fn garbage_day_is_treated_as_missing() {
        let model = mapping(&[("Monday", "garbage"), ("Tuesday", "11:00AM - 11:59PM")]);
        assert!(!expected(&model, &monday_at(13, 30)));
        assert!(expected(&model, &tuesday_at(13, 30)));
    }

    #[test]
    fn overnight_schedule_covers_late_evening() {
        let model = mapping(&[("Monday", "6:00PM - 2:00AM")]);
        assert!(expected(&model, &monday_at(23, 30)));
        assert!(expected(&model, &monday_at(1, 0)));
        assert!(!expected(&model, &monday_at(12, 0)));
    }

    #[test]
    fn free_text_uses_default_fallback_window() {
        let model = HoursModel::FreeText("11 AM to 11 PM".to_string());
        assert!(!expected(&model, &monday_at(10, 59)));
        assert!(expected(&model, &monday_at(11, 0)));
        assert!(expected(&model, &monday_at(22, 59)));
        assert!(!expected(&model, &monday_at(23, 0)));
    }

    #[test]
    fn free_text_honours_configured_fallback() {
        let evaluator = Evaluator::new(Interval::new(
            TimeOfDay::from_hm(9, 0),
            TimeOfDay::from_hm(17, 0),
        ));
        let model = HoursModel::FreeText("weekdays".to_string());
        let expectation = evaluator.explain(&model, &monday_at(8, 0));
        assert!(!expectation.open);
        assert!(matches!(expectation.basis, Basis::FallbackWindow { .. }));
        assert!(evaluator.expected(&model, &monday_at(9, 0)));
    }

    #[test]
    fn weekday_and_minute_come_from_the_location_zone() {
        // Monday 20:00 UTC is Tuesday 01:30 in Kolkata.
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 20, 0, 0).single().expect("valid");
        let ctx = EvaluationContext::new(now, Kolkata);
        let (day, minute) = ctx.local_day_and_minute();
        assert_eq!(day, Weekday::Tue);
        assert_eq!(minute.minutes(), 90);

        let model = mapping(&[("Monday", "11:00AM - 11:59PM")]);
        assert!(!expected(&model, &ctx));
        assert!(expected(&model, &EvaluationContext::new(now, UTC)));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let model = mapping(&[("Monday", "11:00AM - 11:59PM")]);
        let ctx = monday_at(13, 30);
        let first = Evaluator::default().explain(&model, &ctx);
        for _ in 0..10 {
            assert_eq!(Evaluator::default().explain(&model, &ctx), first);
        }
    }

    #[test]
    fn basis_serializes_with_kind_tag() {
        let basis = Basis::MissingDay { day: Weekday::Mon };
        let json = serde_json::to_value(basis).expect("serialize");
        assert_eq!(json["kind"], "missing_day");
        assert_eq!(json["day"], "Monday");
    }
}
