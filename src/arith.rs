//! Calendar arithmetic on [`Date`].
//!
//! Everything here works on the (year, month, day) triple, never on elapsed
//! real time, and is total: results that leave chrono's supported range
//! saturate at `NaiveDate::MIN` / `NaiveDate::MAX`.

use chrono::{Datelike, Days, Months, NaiveDate};
use tracing::warn;

use crate::Date;
use crate::consts::{
    DAYS_IN_COMMON_YEAR, DAYS_IN_LEAP_YEAR, MIN_DAY, MONTHS_PER_QUARTER, MONTHS_PER_YEAR,
};
use crate::types::days_in_month;

/// Splits a 0-based month count since year 0 into (year, 1-based month).
fn fold_months(total: i64) -> (i64, u32) {
    (
        total.div_euclid(MONTHS_PER_YEAR),
        total.rem_euclid(MONTHS_PER_YEAR) as u32 + 1,
    )
}

fn saturate(forward: bool) -> Date {
    warn!(forward, "date arithmetic left the supported calendar range, saturating");
    if forward {
        Date::from(NaiveDate::MAX)
    } else {
        Date::from(NaiveDate::MIN)
    }
}

/// Builds a date from a valid month and day, saturating when only the year is out of range.
fn from_parts(year: i64, month: u32, day: u32) -> Date {
    i32::try_from(year)
        .ok()
        .and_then(|y| NaiveDate::from_ymd_opt(y, month, day))
        .map_or_else(|| saturate(year > 0), Date::from)
}

/// Like [`from_parts`], but a day past the month's end becomes the 1st of the
/// following month.
fn from_parts_overflowing(year: i64, month: u32, day: u32) -> Date {
    let Ok(y) = i32::try_from(year) else {
        return saturate(year > 0);
    };
    if day > days_in_month(y, month) {
        // `month` is 1-based, so as a 0-based index it names the next month
        let (next_year, next_month) = fold_months(year * MONTHS_PER_YEAR + i64::from(month));
        return from_parts(next_year, next_month, MIN_DAY);
    }
    from_parts(year, month, day)
}

impl Date {
    /// Builds a date from possibly out-of-range components.
    ///
    /// The month is folded into the year first (`13` is January of the next
    /// year, `0` is December of the previous one), then the day is counted
    /// forward from the 1st of that month, so day `0` is the last day of the
    /// previous month and `Date::new(2021, 2, 29)` is March 1st.
    pub fn new(year: i32, month: i32, day: i32) -> Self {
        let (y, m) = fold_months(i64::from(year) * MONTHS_PER_YEAR + i64::from(month) - 1);
        from_parts(y, m, MIN_DAY).add_days(i64::from(day) - 1)
    }

    /// Moves by whole calendar days.
    pub fn add_days(&self, days: i64) -> Self {
        let magnitude = Days::new(days.unsigned_abs());
        let shifted = if days >= 0 {
            self.0.checked_add_days(magnitude)
        } else {
            self.0.checked_sub_days(magnitude)
        };
        shifted.map_or_else(|| saturate(days >= 0), Self)
    }

    /// Moves by whole months. A day-of-month missing from the target month
    /// overflows to the 1st of the month after it: May 31st plus one month
    /// is July 1st.
    pub fn add_months(&self, months: i32) -> Self {
        self.shift_months(i64::from(months))
    }

    /// Moves by whole years, with the same overflow rule as
    /// [`add_months`](Self::add_months): Feb 29th plus one year is March 1st.
    pub fn add_years(&self, years: i32) -> Self {
        self.shift_months(i64::from(years) * MONTHS_PER_YEAR)
    }

    fn shift_months(&self, months: i64) -> Self {
        let total = i64::from(self.year()) * MONTHS_PER_YEAR + i64::from(self.0.month0()) + months;
        let (year, month) = fold_months(total);
        from_parts_overflowing(year, month, self.day())
    }

    pub fn start_of_month(&self) -> Self {
        self.0.with_day(MIN_DAY).map_or(*self, Self)
    }

    /// Last day of this date's month: the day before the 1st of the next one.
    pub fn end_of_month(&self) -> Self {
        self.start_of_month()
            .0
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            // only December of the last supported year has no next month
            .map_or(Self(NaiveDate::MAX), Self)
    }

    /// Length of this date's month: 28, 29, 30 or 31.
    pub fn days_in_month(&self) -> u32 {
        self.end_of_month().day()
    }

    /// 365, or 366 in a proleptic Gregorian leap year.
    pub fn days_in_year(&self) -> u32 {
        if self.is_leap_year() {
            DAYS_IN_LEAP_YEAR
        } else {
            DAYS_IN_COMMON_YEAR
        }
    }

    pub fn is_leap_year(&self) -> bool {
        self.0.leap_year()
    }

    /// Calendar quarter, 1 through 4.
    pub fn quarter(&self) -> u32 {
        self.0.month0() / MONTHS_PER_QUARTER + 1
    }

    /// First day of this date's quarter (January, April, July or October 1st).
    pub fn start_of_quarter(&self) -> Self {
        let month = (self.quarter() - 1) * MONTHS_PER_QUARTER + 1;
        from_parts(i64::from(self.year()), month, MIN_DAY)
    }

    /// First day of the following quarter; Q4 rolls into January of the next year.
    pub fn start_of_next_quarter(&self) -> Self {
        self.start_of_quarter().add_months(MONTHS_PER_QUARTER as i32)
    }

    /// Signed number of days from `self` to `other`.
    pub fn days_until(&self, other: &Self) -> i64 {
        other.0.signed_duration_since(self.0).num_days()
    }
}
