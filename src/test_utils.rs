use chrono::NaiveDate;

use crate::Date;

/// Parses a `YYYY-MM-DD` literal
pub fn date(s: &str) -> Date {
    s.parse().unwrap()
}

/// Builds a date from components that must already be valid
pub fn ymd(year: i32, month: u32, day: u32) -> Date {
    Date::from(NaiveDate::from_ymd_opt(year, month, day).unwrap())
}
