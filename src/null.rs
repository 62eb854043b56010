use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Date, prelude::*};

/// A date that may be explicitly absent.
///
/// The default value is absent. Absent dates encode as JSON `null` and as SQL
/// `NULL`, never as a date string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, From, Into)]
pub struct NullDate(Option<Date>);

impl NullDate {
    /// Wraps a present date.
    pub const fn new(date: Date) -> Self {
        Self(Some(date))
    }

    /// The absent value.
    pub const fn null() -> Self {
        Self(None)
    }

    pub const fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    pub const fn date(&self) -> Option<Date> {
        self.0
    }
}

impl From<Date> for NullDate {
    fn from(date: Date) -> Self {
        Self::new(date)
    }
}

/// Renders the date, or nothing when absent.
impl fmt::Display for NullDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(date) => write!(f, "{date}"),
            None => Ok(()),
        }
    }
}

impl Serialize for NullDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self.0 {
            Some(date) => date.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for NullDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Option::<Date>::deserialize(deserializer).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::date;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct J {
        d: NullDate,
    }

    #[test]
    fn test_new_is_valid() {
        let d = date("2013-07-13");
        let nd = NullDate::new(d);
        assert!(nd.is_valid());
        assert_eq!(nd.date(), Some(d));
        assert_eq!(NullDate::from(d), nd);
    }

    #[test]
    fn test_default_is_absent() {
        let nd = NullDate::default();
        assert!(!nd.is_valid());
        assert_eq!(nd.date(), None);
        assert_eq!(nd, NullDate::null());
    }

    #[test]
    fn test_option_conversions() {
        let d = date("2013-07-13");
        assert_eq!(NullDate::from(Some(d)), NullDate::new(d));
        assert_eq!(NullDate::from(None::<Date>), NullDate::null());
        assert_eq!(Option::<Date>::from(NullDate::new(d)), Some(d));
        assert_eq!(Option::<Date>::from(NullDate::null()), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(NullDate::new(date("2013-07-13")).to_string(), "2013-07-13");
        assert_eq!(NullDate::null().to_string(), "");
    }

    #[test]
    fn test_json_date() {
        let j = J {
            d: NullDate::new(date("2015-05-21")),
        };
        let json = serde_json::to_string(&j).unwrap();
        assert_eq!(json, r#"{"d":"2015-05-21"}"#);

        let parsed: J = serde_json::from_str(&json).unwrap();
        assert!(parsed.d.is_valid());
        assert_eq!(parsed.d.date(), Some(date("2015-05-21")));
    }

    #[test]
    fn test_json_null() {
        let j = J::default();
        let json = serde_json::to_string(&j).unwrap();
        assert_eq!(json, r#"{"d":null}"#);

        let parsed: J = serde_json::from_str(&json).unwrap();
        assert!(!parsed.d.is_valid());
    }

    #[test]
    fn test_json_malformed_date() {
        let result: Result<J, _> = serde_json::from_str(r#"{"d":"2015-02-30"}"#);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Invalid day 30"));

        let result: Result<J, _> = serde_json::from_str(r#"{"d":12}"#);
        assert!(result.is_err());
    }
}
