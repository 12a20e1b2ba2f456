//! Departure times.
//!
//! Timetable documents give each departure as an hour and a minute. The
//! scraper that produces them has historically written both fields as
//! strings (`"7"`, `"05"`), so both JSON integers and decimal strings are
//! accepted. Values are validated on the way in; a `Departure` is always a
//! real time of day.

use std::fmt;

use chrono::Timelike;
use serde::{Deserialize, Serialize};

/// Number of minutes in a day.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Error returned when a departure time is out of range or malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A single scheduled bus departure within a day.
///
/// # Examples
///
/// ```
/// use bus_board::domain::Departure;
///
/// let dep = Departure::new(7, 5).unwrap();
/// assert_eq!(dep.minutes_of_day(), 425);
/// assert_eq!(dep.to_string(), "7:05");
///
/// assert!(Departure::new(24, 0).is_err());
/// assert!(Departure::new(7, 60).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDeparture")]
pub struct Departure {
    hour: u8,
    minute: u8,
    /// Annotation mark printed next to the minute in the source timetable.
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

impl Departure {
    /// Create a departure from an hour (0-23) and minute (0-59).
    pub fn new(hour: u32, minute: u32) -> Result<Self, TimeError> {
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }
        Ok(Self {
            hour: hour as u8,
            minute: minute as u8,
            note: None,
        })
    }

    /// Attach an annotation mark.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let note = note.into();
        self.note = if note.is_empty() { None } else { Some(note) };
        self
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Returns the annotation mark, if any.
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Minutes since midnight (0-1439).
    pub fn minutes_of_day(&self) -> u16 {
        self.hour as u16 * 60 + self.minute as u16
    }
}

impl fmt::Display for Departure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.hour, self.minute)
    }
}

/// Minutes since midnight for any time-of-day value.
pub fn minutes_of_day(time: &impl Timelike) -> u16 {
    (time.hour() * 60 + time.minute()) as u16
}

/// Wire shape of a departure before validation.
#[derive(Deserialize)]
struct RawDeparture {
    hour: TimeField,
    minute: TimeField,
    #[serde(default)]
    note: Option<String>,
}

/// An hour or minute as written in the document.
#[derive(Deserialize)]
#[serde(untagged)]
enum TimeField {
    Number(u64),
    Text(String),
}

impl TimeField {
    fn value(&self) -> Result<u32, TimeError> {
        match self {
            TimeField::Number(n) => {
                u32::try_from(*n).map_err(|_| TimeError::new("value out of range"))
            }
            TimeField::Text(s) => parse_decimal(s.trim()),
        }
    }
}

impl TryFrom<RawDeparture> for Departure {
    type Error = TimeError;

    fn try_from(raw: RawDeparture) -> Result<Self, Self::Error> {
        let departure = Departure::new(raw.hour.value()?, raw.minute.value()?)?;
        Ok(match raw.note {
            Some(note) => departure.with_note(note),
            None => departure,
        })
    }
}

/// Parse one or two ASCII digits.
fn parse_decimal(s: &str) -> Result<u32, TimeError> {
    if s.is_empty() || s.len() > 2 {
        return Err(TimeError::new("expected one or two digits"));
    }
    s.bytes().try_fold(0u32, |acc, b| {
        (b as char)
            .to_digit(10)
            .map(|d| acc * 10 + d)
            .ok_or_else(|| TimeError::new("expected decimal digits"))
    })
}
