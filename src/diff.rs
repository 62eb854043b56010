use serde::{Deserialize, Serialize};

use crate::{Date, prelude::*};

/// Civil difference between two dates, as non-negative magnitudes.
///
/// `months` is the total number of whole months (`years * 12` plus the
/// remainder), and `days` is the elapsed day count, computed on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[display(fmt = "{years} years, {months} months, {days} days")]
pub struct DateDiff {
    pub years: u32,
    pub months: u32,
    pub days: u64,
}

/// Computes the civil difference between `a` and `b`. Argument order does
/// not matter.
///
/// Years and months come from field-wise subtraction with borrowing: a later
/// day-of-month smaller than the earlier one borrows a month, and a negative
/// month difference borrows a year.
pub fn diff(a: Date, b: Date) -> DateDiff {
    let (earlier, later) = if a > b { (b, a) } else { (a, b) };

    let days = earlier.days_until(&later).unsigned_abs();

    let mut years = later.year() - earlier.year();
    let mut months = later.month().number() as i32 - earlier.month().number() as i32;
    if later.day() < earlier.day() {
        months -= 1;
    }
    if months < 0 {
        months += 12;
        years -= 1;
    }

    DateDiff {
        years: years.unsigned_abs(),
        months: (years * 12 + months).unsigned_abs(),
        days,
    }
}

impl Date {
    /// Civil difference between `self` and `other`; see [`diff`].
    pub fn diff_from(&self, other: &Self) -> DateDiff {
        diff(*self, *other)
    }
}
