use std::fmt;

use serde::Serialize;

use crate::time::{parse_time, ParseError, TimeOfDay};

/// Separator between the open and close tokens of a published range.
pub const RANGE_SEPARATOR: &str = " - ";

/// An open/close pair within a single day's schedule.
///
/// When `close` is earlier than `open` the interval wraps past midnight
/// (`23:00 - 01:00`). When `close == open` the location is treated as open
/// around the clock, so `00:00 - 00:00` means "open all day".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Interval {
    open: TimeOfDay,
    close: TimeOfDay,
}

impl Interval {
    #[must_use]
    pub const fn new(open: TimeOfDay, close: TimeOfDay) -> Self {
        Self { open, close }
    }

    #[must_use]
    pub const fn open(&self) -> TimeOfDay {
        self.open
    }

    #[must_use]
    pub const fn close(&self) -> TimeOfDay {
        self.close
    }

    #[must_use]
    pub fn is_overnight(&self) -> bool {
        self.close <= self.open
    }

    #[must_use]
    pub fn is_all_day(&self) -> bool {
        self.close == self.open
    }

    /// Whether `now` falls inside the interval, honouring overnight wraparound.
    #[must_use]
    pub fn contains(&self, now: TimeOfDay) -> bool {
        if self.close > self.open {
            self.open <= now && now < self.close
        } else {
            now >= self.open || now < self.close
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{RANGE_SEPARATOR}{}", self.open, self.close)
    }
}

/// Free-function form of [`Interval::contains`].
#[must_use]
pub fn is_open(interval: &Interval, now: TimeOfDay) -> bool {
    interval.contains(now)
}

/// Parses an `"open - close"` range such as `"11:00AM - 11:59PM"`.
///
/// # Errors
///
/// Returns [`ParseError::MalformedRange`] unless the input splits on `" - "`
/// into exactly two tokens, and propagates token errors from [`parse_time`].
pub fn parse_range(input: &str) -> Result<Interval, ParseError> {
    let mut parts = input.split(RANGE_SEPARATOR);
    let (Some(open), Some(close), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ParseError::MalformedRange {
            input: input.to_owned(),
        });
    };

    Ok(Interval::new(parse_time(open)?, parse_time(close)?))
}
