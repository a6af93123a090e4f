//! Wall-clock and timestamp helpers.
//!
//! Working windows are configured as `HH:MM` strings. They are parsed once,
//! at the boundary, into [`ClockTime`] so the scheduler only ever deals with
//! minutes since midnight.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Time of day with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u32);

impl ClockTime {
    /// Constant constructor for known-good values.
    pub(crate) const fn hm(hour: u32, minute: u32) -> Self {
        Self(hour * 60 + minute)
    }

    /// Build from hour and minute; `None` when out of range.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self(hour * 60 + minute))
        } else {
            None
        }
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u32 {
        self.0
    }

    pub fn hour(self) -> u32 {
        self.0 / 60
    }

    pub fn minute(self) -> u32 {
        self.0 % 60
    }
}

impl FromStr for ClockTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidClockTime(s.to_string());
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
            return Err(invalid());
        }
        let hour: u32 = hour.parse().map_err(|_| invalid())?;
        let minute: u32 = minute.parse().map_err(|_| invalid())?;
        Self::from_hm(hour, minute).ok_or_else(invalid)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Timestamp `minutes` after midnight of `date`.
pub fn at_minute(date: NaiveDate, minutes: u32) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + Duration::minutes(i64::from(minutes))
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a stored timestamp.
///
/// Accepts RFC 3339, SQLite's `YYYY-MM-DD HH:MM:SS`, ISO date-times without
/// an offset and bare `YYYY-MM-DD` dates (midnight). Values without an
/// offset are read as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

/// `deserialize_with` helper for required timestamps.
pub(crate) fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
}

/// `deserialize_with` helper for optional timestamps. Empty strings are `None`.
pub(crate) fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'"))),
    }
}

/// Round to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn parses_and_formats_clock_time() {
        let t: ClockTime = "09:05".parse().unwrap();
        assert_eq!(t.minutes(), 545);
        assert_eq!(t.to_string(), "09:05");

        let single_digit: ClockTime = "9:30".parse().unwrap();
        assert_eq!(single_digit.minutes(), 570);
    }

    #[test]
    fn rejects_malformed_clock_time() {
        for bad in ["", "9", "24:00", "12:60", "ab:cd", "12:5", "12:30:00", "-1:30"] {
            assert!(bad.parse::<ClockTime>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn clock_time_serializes_as_string() {
        let t = ClockTime::from_hm(18, 0).unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"18:00\"");
        let back: ClockTime = serde_json::from_str("\"07:45\"").unwrap();
        assert_eq!(back, ClockTime::from_hm(7, 45).unwrap());
        assert!(serde_json::from_str::<ClockTime>("\"7h45\"").is_err());
    }

    #[test]
    fn at_minute_builds_local_timestamp() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let ts = at_minute(date, 9 * 60 + 25);
        assert_eq!(ts.to_string(), "2024-05-01 09:25:00");
    }

    #[test]
    fn parse_timestamp_accepts_stored_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 14, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-05-01T14:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T16:30:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01 14:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T14:30"), Some(expected));

        let midnight = parse_timestamp("2024-05-01").unwrap();
        assert_eq!(midnight.hour(), 0);
        assert!(parse_timestamp("next tuesday").is_none());
    }

    #[test]
    fn round1_rounds_half_away_from_zero() {
        assert_eq!(round1(0.25), 0.3);
        assert_eq!(round1(1.0 / 3.0), 0.3);
        assert_eq!(round1(2.0), 2.0);
    }
}
