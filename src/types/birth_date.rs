use std::{
    fmt::{Display, Write},
    str::FromStr,
};

use chrono::{DateTime, FixedOffset, Locale, NaiveDate, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Format of the date field in the author form.
pub const FORM_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{0}` is not a recognised date")]
pub struct BirthDateError(pub String);

/// Calendar date of birth.
///
/// Always sent to the server as `YYYY-MM-DDT00:00:00`. Accepted from the server as a
/// plain date, a naive timestamp or an RFC 3339 timestamp; the time of day is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BirthDate(pub NaiveDate);

impl BirthDate {
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Strict `YYYY-MM-DD`, as held by the form.
    pub fn parse_form(s: &str) -> Result<Self, BirthDateError> {
        NaiveDate::parse_from_str(s.trim(), FORM_FORMAT)
            .map(BirthDate)
            .map_err(|_| BirthDateError(s.to_string()))
    }

    /// Loose human input such as `oct 7, 1970` or `1970/10/07`.
    pub fn parse_loose(s: &str) -> Result<Self, BirthDateError> {
        if let Ok(date) = Self::parse_form(s) {
            return Ok(date);
        }
        dateparser::parse_with_timezone(s.trim(), &Utc)
            .map(|x| BirthDate(x.date_naive()))
            .map_err(|_| BirthDateError(s.to_string()))
    }

    pub fn to_form_value(&self) -> String {
        self.0.format(FORM_FORMAT).to_string()
    }

    pub fn to_wire(&self) -> String {
        format!("{}T00:00:00", self.to_form_value())
    }

    pub fn is_after(&self, today: NaiveDate) -> bool {
        self.0 > today
    }

    /// Long display form, `1 de mayo de 1990` for `es_MX` and `%-d de %B de %Y`.
    /// An unusable format gives the form value instead.
    pub fn format_localized(&self, format: &str, locale: Locale) -> String {
        let mut s = String::new();
        match write!(s, "{}", self.0.format_localized(format, locale)) {
            Ok(()) => s,
            Err(_) => self.to_form_value(),
        }
    }
}

impl FromStr for BirthDate {
    type Err = BirthDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(date) = NaiveDate::parse_from_str(s, FORM_FORMAT) {
            return Ok(BirthDate(date));
        }
        if let Ok(ts) = s.parse::<NaiveDateTime>() {
            return Ok(BirthDate(ts.date()));
        }
        DateTime::<FixedOffset>::parse_from_rfc3339(s)
            .map(|ts| BirthDate(ts.date_naive()))
            .map_err(|_| BirthDateError(s.to_string()))
    }
}

impl Display for BirthDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_form_value())
    }
}

impl Serialize for BirthDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wire())
    }
}

impl<'de> Deserialize<'de> for BirthDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
