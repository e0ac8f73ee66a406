//! Time-of-day tokens as they appear in published opening hours.

use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Number of minutes in a day; every [`TimeOfDay`] is strictly below this.
pub const MINUTES_PER_DAY: u16 = 1440;

/// Minutes since local midnight, always in `[0, 1440)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MIDNIGHT: Self = Self(0);

    /// Builds a time from an hour and minute, reducing each into its natural
    /// range first (`25:99` becomes `01:39`).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_hm(hour: u32, minute: u32) -> Self {
        // (23 * 60 + 59) fits comfortably in u16.
        Self(((hour % 24) * 60 + minute % 60) as u16)
    }

    /// Builds a time from a raw minute count, wrapping past midnight.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_minutes(minutes: u32) -> Self {
        Self((minutes % MINUTES_PER_DAY as u32) as u16)
    }

    #[must_use]
    pub const fn minutes(self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn hour(self) -> u16 {
        self.0 / 60
    }

    #[must_use]
    pub const fn minute(self) -> u16 {
        self.0 % 60
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A token or range that could not be read as opening hours.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("time token {token:?} contains no hour digits")]
    MissingHour { token: String },

    #[error("time token {token:?} has a non-numeric {component} component")]
    NonNumeric {
        token: String,
        component: &'static str,
    },

    #[error("hours range {input:?} is not of the form \"open - close\"")]
    MalformedRange { input: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

/// Parses a single time-of-day token such as `"11:00AM"`, `"11:59 pm"`, or
/// `"23:00"` into a [`TimeOfDay`].
///
/// Whitespace is ignored and the `AM`/`PM` marker is case-insensitive. A
/// token without a marker is read as 24-hour time and left unadjusted. A
/// missing hour or minute component defaults to zero; each component takes
/// its leading digits, the way published hours are usually written (`"11h"`
/// reads as 11).
///
/// # Errors
///
/// Returns [`ParseError::MissingHour`] when the token has no digit at all, and
/// [`ParseError::NonNumeric`] when a present component does not start with a
/// digit.
pub fn parse_time(token: &str) -> Result<TimeOfDay, ParseError> {
    let compact: String = token
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    let (body, meridiem) = split_meridiem(&compact);

    if !body.bytes().any(|b| b.is_ascii_digit()) {
        return Err(ParseError::MissingHour {
            token: token.to_owned(),
        });
    }

    let mut parts = body.split(':');
    let hour = parse_component(parts.next(), token, "hour")?;
    let minute = parse_component(parts.next(), token, "minute")?;

    let hour = match meridiem {
        Some(Meridiem::Pm) if hour < 12 => hour + 12,
        Some(Meridiem::Am) if hour == 12 => 0,
        _ => hour,
    };

    Ok(TimeOfDay::from_hm(hour, minute))
}

fn split_meridiem(compact: &str) -> (&str, Option<Meridiem>) {
    if let Some(body) = compact.strip_suffix("AM") {
        (body, Some(Meridiem::Am))
    } else if let Some(body) = compact.strip_suffix("PM") {
        (body, Some(Meridiem::Pm))
    } else {
        (compact, None)
    }
}

fn parse_component(
    part: Option<&str>,
    token: &str,
    component: &'static str,
) -> Result<u32, ParseError> {
    let Some(part) = part.filter(|p| !p.is_empty()) else {
        return Ok(0);
    };

    let digits: Vec<u8> = part
        .bytes()
        .take_while(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect();

    if digits.is_empty() {
        return Err(ParseError::NonNumeric {
            token: token.to_owned(),
            component,
        });
    }

    // Saturate rather than overflow on absurd digit runs; the modulo in
    // `TimeOfDay::from_hm` brings the result back into range.
    Ok(digits
        .into_iter()
        .fold(0u32, |acc, d| acc.saturating_mul(10).saturating_add(u32::from(d))))
}
