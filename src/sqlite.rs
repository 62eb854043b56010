//! `rusqlite` binding for [`Date`] and [`NullDate`].
//!
//! SQLite has no date storage class. Timestamp columns are lifted into an
//! [`SqlValue::Timestamp`] before scanning: TEXT holding an RFC 3339 or
//! `YYYY-MM-DD HH:MM:SS` (UTC) timestamp, and INTEGER read as Unix seconds.
//! Everything else reaches the scanner as is, so `YYYY-MM-DD` text is parsed
//! there.

use chrono::{DateTime, NaiveDateTime};
use rusqlite::ToSql;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, Value, ValueRef};

use crate::{Date, NullDate, Scanner, SqlValue, Valuer};

/// Layout of SQLite's `CURRENT_TIMESTAMP`
const SQLITE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn lift_text(text: &str) -> SqlValue {
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return SqlValue::Timestamp(instant);
    }
    NaiveDateTime::parse_from_str(text, SQLITE_TIMESTAMP_FORMAT).map_or_else(
        |_| SqlValue::Text(text.to_owned()),
        |naive| SqlValue::Timestamp(naive.and_utc().fixed_offset()),
    )
}

fn lift(value: ValueRef<'_>) -> FromSqlResult<SqlValue> {
    Ok(match value {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(secs) => DateTime::from_timestamp(secs, 0)
            .map_or(SqlValue::Integer(secs), |instant| {
                SqlValue::Timestamp(instant.fixed_offset())
            }),
        ValueRef::Real(real) => SqlValue::Real(real),
        ValueRef::Text(_) => lift_text(value.as_str()?),
        ValueRef::Blob(blob) => SqlValue::Blob(blob.to_vec()),
    })
}

fn scan_column<T: Scanner + Default>(value: ValueRef<'_>) -> FromSqlResult<T> {
    let mut target = T::default();
    target
        .scan(lift(value)?)
        .map_err(|err| FromSqlError::Other(Box::new(err)))?;
    Ok(target)
}

impl From<SqlValue> for Value {
    fn from(value: SqlValue) -> Self {
        match value {
            SqlValue::Null => Self::Null,
            SqlValue::Integer(int) => Self::Integer(int),
            SqlValue::Real(real) => Self::Real(real),
            SqlValue::Text(text) => Self::Text(text),
            SqlValue::Blob(blob) => Self::Blob(blob),
            SqlValue::Date(date) => Self::Text(Date::from(date).to_string()),
            SqlValue::Timestamp(instant) => Self::Text(instant.to_rfc3339()),
        }
    }
}

impl FromSql for Date {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        scan_column(value)
    }
}

impl ToSql for Date {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Owned(self.value().into()))
    }
}

impl FromSql for NullDate {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        scan_column(value)
    }
}

impl ToSql for NullDate {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Owned(self.value().into()))
    }
}
