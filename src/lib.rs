mod arith;
mod clock;
mod consts;
mod diff;
mod null;
mod prelude;
mod sql;
#[cfg(feature = "sqlite")]
mod sqlite;
#[cfg(test)]
mod test_utils;
mod types;

pub use clock::{Clock, FixedClock, SystemClock, ZoneError, load_zone};
pub use consts::*;
pub use diff::{DateDiff, diff};
pub use null::NullDate;
pub use sql::{ScanError, Scanner, SqlValue, Valuer};
pub use types::{Month, Weekday, days_in_month, days_in_year, is_leap_year};

use crate::prelude::*;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Offset, TimeDelta, TimeZone, Utc};
use std::str::FromStr;
use tracing::debug;

/// A civil calendar day: year, month and day with no time-of-day or zone.
///
/// Values are always normalized. Parsing is strict, while construction and
/// arithmetic roll out-of-range components forward into the next valid date.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display, From, Into,
)]
pub struct Date(NaiveDate);

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0} (expected YYYY-MM-DD)")]
    InvalidFormat(String),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u32),
    #[display(fmt = "Invalid day {day} for month {year:04}-{month:02}")]
    InvalidDay { year: i32, month: u32, day: u32 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

impl Date {
    /// Parses a date literal known to be valid.
    ///
    /// # Panics
    /// Panics if `s` is not a valid `YYYY-MM-DD` date. Use [`str::parse`] for
    /// input that is not a literal.
    pub fn must_parse(s: &str) -> Self {
        match s.parse() {
            Ok(date) => date,
            Err(err) => panic!("invalid date literal {s:?}: {err}"),
        }
    }

    /// Truncates an instant to its calendar date in the instant's own zone.
    pub fn from_instant<Z: TimeZone>(instant: &DateTime<Z>) -> Self {
        Self(instant.date_naive())
    }

    /// Midnight of this date in UTC.
    pub fn time(&self) -> DateTime<Utc> {
        self.0.and_time(NaiveTime::MIN).and_utc()
    }

    /// Local midnight of this date in `zone`.
    ///
    /// When a transition skips local midnight, the instant carries the offset
    /// in force at UTC midnight of the same date.
    pub fn time_in<Z: TimeZone>(&self, zone: &Z) -> DateTime<Z> {
        let midnight = self.0.and_time(NaiveTime::MIN);
        zone.from_local_datetime(&midnight).earliest().unwrap_or_else(|| {
            let offset = zone.offset_from_utc_datetime(&midnight).fix();
            let shifted = midnight
                .checked_sub_signed(TimeDelta::seconds(i64::from(offset.local_minus_utc())))
                .unwrap_or(midnight);
            zone.from_utc_datetime(&shifted)
        })
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> Month {
        Month::from_index0(self.0.month0())
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn weekday(&self) -> Weekday {
        Weekday::from(self.0.weekday())
    }

    /// Day of the year, starting at 1 for January 1st
    pub fn year_day(&self) -> u32 {
        self.0.ordinal()
    }

    /// Strict `YYYY-MM-DD` parse without logging. Never normalizes.
    fn parse_strict(s: &str) -> Result<Self, ParseError> {
        if s.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let parts: Vec<&str> = s.split(DATE_SEPARATOR).collect();
        let [year, month, day] = parts.as_slice() else {
            return Err(ParseError::InvalidFormat(s.to_owned()));
        };

        let year: i32 = Self::parse_field(year, YEAR_WIDTH, s)?;
        let month: u32 = Self::parse_field(month, MONTH_WIDTH, s)?;
        let day: u32 = Self::parse_field(day, DAY_WIDTH, s)?;

        let month = Month::new(month)?.number();
        if day < MIN_DAY || day > days_in_month(year, month) {
            return Err(ParseError::InvalidDay { year, month, day });
        }

        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or(ParseError::InvalidDay { year, month, day })
    }

    /// Parses one fixed-width, all-digit field of `input`
    fn parse_field<T: FromStr>(field: &str, width: usize, input: &str) -> Result<T, ParseError> {
        if field.len() != width || !field.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidFormat(input.to_owned()));
        }
        field
            .parse()
            .map_err(|_| ParseError::InvalidFormat(input.to_owned()))
    }
}

impl FromStr for Date {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_strict(s).inspect_err(|err| debug!(input = s, %err, "rejected date text"))
    }
}

/// The earlier of two dates.
pub fn min(a: Date, b: Date) -> Date {
    std::cmp::min(a, b)
}

/// The later of two dates.
pub fn max(a: Date, b: Date) -> Date {
    std::cmp::max(a, b)
}

impl serde::Serialize for Date {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Date {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
