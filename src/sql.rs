//! Database scalar binding.
//!
//! Drivers hand values to [`Scanner::scan`] as an [`SqlValue`] and take them
//! back from [`Valuer::value`]. Every source shape a driver can produce is a
//! variant here, so the accepted shapes are checked exhaustively.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use tracing::debug;

use crate::{Date, NullDate, ParseError};

/// A scalar crossing the database boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
    /// A native calendar date column
    Date(NaiveDate),
    /// A native timestamp column, with the offset it was read in
    Timestamp(DateTime<FixedOffset>),
}

impl SqlValue {
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Text(_) => "text",
            Self::Blob(_) => "blob",
            Self::Date(_) => "date",
            Self::Timestamp(_) => "timestamp",
        }
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<Date> for SqlValue {
    fn from(date: Date) -> Self {
        Self::Date(date.into())
    }
}

impl From<Option<Date>> for SqlValue {
    fn from(date: Option<Date>) -> Self {
        date.map_or(Self::Null, Self::from)
    }
}

impl<Z: TimeZone> From<DateTime<Z>> for SqlValue {
    fn from(instant: DateTime<Z>) -> Self {
        Self::Timestamp(instant.fixed_offset())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// The source value has a shape the target cannot hold.
    #[error("Unsupported scan source: cannot store {type_name} into {target}")]
    UnsupportedSource {
        type_name: &'static str,
        target: &'static str,
    },
    /// Text source that is not a `YYYY-MM-DD` date.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A scan target for values read from a database.
pub trait Scanner {
    /// Replaces `self` with `src`.
    ///
    /// # Errors
    /// Returns `ScanError::UnsupportedSource` if `src` has an unsupported
    /// shape, or `ScanError::Parse` for malformed date text. Either way
    /// `self` is left unchanged.
    fn scan(&mut self, src: SqlValue) -> Result<(), ScanError>;
}

/// A source of values written to a database.
pub trait Valuer {
    fn value(&self) -> SqlValue;
}

fn scan_date(src: SqlValue, target: &'static str) -> Result<Date, ScanError> {
    match src {
        SqlValue::Date(date) => Ok(Date::from(date)),
        SqlValue::Timestamp(instant) => Ok(Date::from_instant(&instant)),
        SqlValue::Text(text) => Ok(text.parse()?),
        other => {
            let type_name = other.type_name();
            debug!(source = type_name, scan_target = target, "unsupported scan source");
            Err(ScanError::UnsupportedSource { type_name, target })
        }
    }
}

impl Scanner for Date {
    fn scan(&mut self, src: SqlValue) -> Result<(), ScanError> {
        *self = scan_date(src, "Date")?;
        Ok(())
    }
}

impl Valuer for Date {
    fn value(&self) -> SqlValue {
        SqlValue::Text(self.to_string())
    }
}

impl Scanner for NullDate {
    fn scan(&mut self, src: SqlValue) -> Result<(), ScanError> {
        *self = match src {
            SqlValue::Null => Self::null(),
            other => Self::new(scan_date(other, "NullDate")?),
        };
        Ok(())
    }
}

impl Valuer for NullDate {
    fn value(&self) -> SqlValue {
        self.date().map_or(SqlValue::Null, |date| date.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::date;
    use chrono::Utc;
    use chrono_tz::Australia::Sydney;

    fn timestamp(y: i32, mo: u32, d: u32, h: u32) -> SqlValue {
        SqlValue::from(Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap())
    }

    #[test]
    fn test_scan_timestamp() {
        let mut d = Date::default();
        d.scan(timestamp(2013, 7, 13, 0)).unwrap();
        assert_eq!(d, date("2013-07-13"));
    }

    #[test]
    fn test_scan_truncates_in_source_offset() {
        let instant = Utc.with_ymd_and_hms(2013, 7, 13, 20, 0, 0).unwrap();
        let mut d = Date::default();
        d.scan(SqlValue::from(instant.with_timezone(&Sydney))).unwrap();
        assert_eq!(d, date("2013-07-14"));
    }

    #[test]
    fn test_scan_native_date() {
        let mut d = Date::default();
        d.scan(SqlValue::from(NaiveDate::from_ymd_opt(2013, 7, 13).unwrap()))
            .unwrap();
        assert_eq!(d, date("2013-07-13"));
    }

    #[test]
    fn test_scan_unsupported_leaves_target() {
        let before = date("2001-01-01");
        for src in [
            SqlValue::Null,
            SqlValue::Integer(3),
            SqlValue::Real(1.5),
            SqlValue::Blob(vec![1, 2]),
        ] {
            let type_name = src.type_name();
            let mut d = before;
            let err = d.scan(src).unwrap_err();
            assert_eq!(
                err,
                ScanError::UnsupportedSource {
                    type_name,
                    target: "Date",
                }
            );
            assert_eq!(d, before);
        }
    }

    #[test]
    fn test_scan_text() {
        let mut d = Date::default();
        d.scan(SqlValue::Text("2013-07-13".to_owned())).unwrap();
        assert_eq!(d, date("2013-07-13"));
    }

    #[test]
    fn test_scan_malformed_text_leaves_target() {
        let before = date("2001-01-01");
        let mut d = before;
        let err = d.scan(SqlValue::Text("2013-02-30".to_owned())).unwrap_err();
        assert_eq!(
            err,
            ScanError::Parse(ParseError::InvalidDay {
                year: 2013,
                month: 2,
                day: 30,
            })
        );
        assert_eq!(err.to_string(), "Invalid day 30 for month 2013-02");
        assert_eq!(d, before);

        let mut nd = NullDate::new(before);
        let err = nd.scan(SqlValue::Text("yesterday".to_owned())).unwrap_err();
        assert!(matches!(err, ScanError::Parse(ParseError::InvalidFormat(_))));
        assert_eq!(nd.date(), Some(before));
    }

    #[test]
    fn test_from_date() {
        let d = date("2013-07-13");
        assert_eq!(SqlValue::from(d), SqlValue::from(NaiveDate::from(d)));
        assert_eq!(SqlValue::from(Some(d)), SqlValue::Date(d.into()));
        assert_eq!(SqlValue::from(None::<Date>), SqlValue::Null);

        let mut nd = NullDate::new(d);
        nd.scan(SqlValue::from(None::<Date>)).unwrap();
        assert!(!nd.is_valid());
        nd.scan(SqlValue::from(Some(d))).unwrap();
        assert_eq!(nd.date(), Some(d));
    }

    #[test]
    fn test_value() {
        assert_eq!(
            date("2013-07-13").value(),
            SqlValue::Text("2013-07-13".to_owned())
        );
    }

    #[test]
    fn test_null_date_scan_date() {
        let mut nd = NullDate::default();
        nd.scan(timestamp(2013, 7, 13, 0)).unwrap();
        assert!(nd.is_valid());
        assert_eq!(nd.date(), Some(date("2013-07-13")));
    }

    #[test]
    fn test_null_date_scan_null() {
        let mut nd = NullDate::new(date("2013-07-13"));
        nd.scan(SqlValue::Null).unwrap();
        assert!(!nd.is_valid());
    }

    #[test]
    fn test_null_date_scan_unsupported() {
        let mut nd = NullDate::new(date("2013-07-13"));
        let err = nd.scan(SqlValue::Real(2.0)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported scan source: cannot store real into NullDate"
        );
        assert_eq!(nd.date(), Some(date("2013-07-13")));
    }

    #[test]
    fn test_null_date_value() {
        assert_eq!(
            NullDate::new(date("2013-07-13")).value(),
            SqlValue::Text("2013-07-13".to_owned())
        );
        assert_eq!(NullDate::default().value(), SqlValue::Null);
    }
}
