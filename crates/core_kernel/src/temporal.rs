//! Calendar handling for monthly billing
//!
//! Bills are keyed by calendar month. [`YearMonth`] is that key: a validated
//! `YYYY-MM` value that orders chronologically and serializes as the same
//! string the stores and callers use.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors related to calendar values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid month '{0}': expected YYYY-MM")]
    InvalidMonth(String),

    #[error("Invalid date '{0}': expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate(String),

    #[error("Date out of supported range")]
    OutOfRange,
}

/// A calendar month, the key of a monthly billing cycle
///
/// Internally anchored on the first day of the month, so ordering and
/// comparisons are plain date comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    /// Creates a month from its year and 1-based month number
    pub fn new(year: i32, month: u32) -> Result<Self, TemporalError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(|| TemporalError::InvalidMonth(format!("{}-{}", year, month)))
    }

    /// The month a date falls in
    pub fn from_date(date: NaiveDate) -> Self {
        // Day 1 of an existing date's month always exists
        Self(date.with_day(1).unwrap_or(date))
    }

    /// The current month in UTC
    pub fn current() -> Self {
        Self::from_date(Utc::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// First day of the month
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// The following month, or `None` past the end of the calendar
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add_months(Months::new(1)).map(Self)
    }

    /// The preceding month, or `None` before the start of the calendar
    pub fn previous(&self) -> Option<Self> {
        self.0.checked_sub_months(Months::new(1)).map(Self)
    }

    /// Returns true if the date falls within this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TemporalError::InvalidMonth(s.to_string());

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl Serialize for YearMonth {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parses a calendar date given either as `YYYY-MM-DD` or as an RFC 3339
/// timestamp, in which case the UTC date is taken
pub fn parse_calendar_date(s: &str) -> Result<NaiveDate, TemporalError> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| TemporalError::InvalidDate(s.to_string()))
}

/// Serde adapter for optional dates stored either as plain dates or as
/// timestamps; always written back as `YYYY-MM-DD`
pub mod optional_calendar_date {
    use super::*;

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.collect_str(&date.format("%Y-%m-%d")),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => parse_calendar_date(s).map(Some).map_err(serde::de::Error::custom),
        }
    }
}
