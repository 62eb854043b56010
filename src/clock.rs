//! Time sources and zone lookup for the "now" constructors.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::Date;

/// A source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The process wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stopped at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub const fn new(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ZoneError {
    #[error("Unknown time zone: {0}")]
    UnknownZone(String),
}

/// Looks up an IANA time zone by name, e.g. `"Australia/Sydney"`.
///
/// # Errors
/// Returns `ZoneError::UnknownZone` if the name is not in the database.
pub fn load_zone(name: &str) -> Result<Tz, ZoneError> {
    name.parse::<Tz>().map_err(|_| {
        debug!(zone = name, "unknown time zone");
        ZoneError::UnknownZone(name.to_owned())
    })
}

impl Date {
    /// The date `clock` reads in `zone`.
    pub fn current<C, Z>(clock: &C, zone: &Z) -> Self
    where
        C: Clock + ?Sized,
        Z: TimeZone,
    {
        Self::from_instant(&clock.now().with_timezone(zone))
    }

    /// The day before the date `clock` reads in `zone`.
    pub fn yesterday_with<C, Z>(clock: &C, zone: &Z) -> Self
    where
        C: Clock + ?Sized,
        Z: TimeZone,
    {
        Self::current(clock, zone).add_days(-1)
    }

    /// The day after the date `clock` reads in `zone`.
    pub fn tomorrow_with<C, Z>(clock: &C, zone: &Z) -> Self
    where
        C: Clock + ?Sized,
        Z: TimeZone,
    {
        Self::current(clock, zone).add_days(1)
    }

    /// Today in UTC.
    pub fn today() -> Self {
        Self::today_in(&Utc)
    }

    pub fn yesterday() -> Self {
        Self::yesterday_in(&Utc)
    }

    pub fn tomorrow() -> Self {
        Self::tomorrow_in(&Utc)
    }

    /// Today in `zone`.
    pub fn today_in<Z: TimeZone>(zone: &Z) -> Self {
        Self::current(&SystemClock, zone)
    }

    pub fn yesterday_in<Z: TimeZone>(zone: &Z) -> Self {
        Self::yesterday_with(&SystemClock, zone)
    }

    pub fn tomorrow_in<Z: TimeZone>(zone: &Z) -> Self {
        Self::tomorrow_with(&SystemClock, zone)
    }
}
