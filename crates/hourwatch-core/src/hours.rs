//! Normalization of heterogeneous opening-hours input.
//!
//! Listings publish hours either as a loose sentence ("11 AM to 11 PM") or as
//! a per-weekday mapping (`{"Monday": "11:00AM - 11:59PM"}`). Both end up as a
//! [`HoursModel`], which is what the evaluator consumes.

use std::collections::BTreeMap;
use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::interval::{parse_range, Interval};

/// Opening hours exactly as the listing source produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawHours {
    Text(String),
    Mapping(BTreeMap<String, String>),
}

impl RawHours {
    /// The stored form of the hours: the text itself, or the mapping encoded
    /// as a JSON object string.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            // A map of strings always encodes; the fallback is unreachable.
            Self::Mapping(map) => serde_json::to_string(map).unwrap_or_default(),
        }
    }
}

impl fmt::Display for RawHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Per-weekday intervals. An absent day means the data for it is missing,
/// not that the location is closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklySchedule {
    days: [Option<Interval>; 7],
}

impl WeeklySchedule {
    #[must_use]
    pub fn get(&self, day: Weekday) -> Option<Interval> {
        self.days[day.num_days_from_monday() as usize]
    }

    pub fn set(&mut self, day: Weekday, interval: Interval) {
        self.days[day.num_days_from_monday() as usize] = Some(interval);
    }

    /// Days with a known interval, Monday first.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, Interval)> + '_ {
        WEEK.iter()
            .zip(self.days.iter())
            .filter_map(|(day, interval)| interval.map(|i| (*day, i)))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.iter().all(Option::is_none)
    }
}

impl Serialize for WeeklySchedule {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(7))?;
        for (day, interval) in WEEK.iter().zip(self.days.iter()) {
            map.serialize_entry(&day_name(*day), &interval.map(|i| i.to_string()))?;
        }
        map.end()
    }
}

/// Normalized opening hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum HoursModel {
    Unknown,
    FreeText(String),
    Weekly(WeeklySchedule),
}

impl HoursModel {
    /// Normalizes input that may be absent altogether.
    #[must_use]
    pub fn from_optional(raw: Option<&RawHours>) -> Self {
        raw.map_or(Self::Unknown, normalize)
    }
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English weekday name for `day`.
#[must_use]
pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Matches a full English weekday name, ignoring case and surrounding
/// whitespace. Abbreviations are not accepted.
#[must_use]
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    let name = name.trim();
    WEEK.into_iter()
        .find(|day| day_name(*day).eq_ignore_ascii_case(name))
}

/// Converts raw hours into a [`HoursModel`]. Never fails: input that cannot
/// be understood degrades to [`HoursModel::Unknown`], and a single bad day in
/// a mapping only removes that day.
#[must_use]
pub fn normalize(raw: &RawHours) -> HoursModel {
    match raw {
        RawHours::Mapping(map) => from_mapping(map),
        RawHours::Text(text) => from_text(text),
    }
}

fn from_text(text: &str) -> HoursModel {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return HoursModel::Unknown;
    }

    // Stored mappings come back from the database as their JSON encoding.
    if trimmed.starts_with('{') {
        if let Ok(map) = serde_json::from_str::<BTreeMap<String, String>>(trimmed) {
            return from_mapping(&map);
        }
    }

    HoursModel::FreeText(trimmed.to_owned())
}

fn from_mapping(map: &BTreeMap<String, String>) -> HoursModel {
    if map.is_empty() {
        return HoursModel::Unknown;
    }

    let mut schedule = WeeklySchedule::default();
    for (key, value) in map {
        let Some(day) = parse_weekday(key) else {
            return HoursModel::Unknown;
        };
        if let Ok(interval) = parse_range(value) {
            schedule.set(day, interval);
        }
    }

    HoursModel::Weekly(schedule)
}

#[cfg(test)]
#[path = "hours_test.rs"]
mod tests;
