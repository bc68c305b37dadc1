//! Date-and-time field type.
//!
//! The hash form is `{ timestamp, rfc850 }`. When reading a hash the RFC 850 string wins
//! over the timestamp; the empty value hashes to `None`.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::FieldTypeEncoder;
use crate::content::FieldValue;
use crate::document::IndexValue;
use crate::error::{Error, Result};
use crate::field_registry::FieldKind;

const RFC850_FORMAT: &str = "%A, %d-%b-%y %H:%M:%S";

/// Serialized form of a date-and-time value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTimeHash {
    /// UTC timestamp in seconds.
    pub timestamp: i64,
    /// The same instant as an RFC 850 string, e.g. `Thursday, 01-Jan-70 00:00:00 UTC`.
    pub rfc850: Option<String>,
}

/// A date and time, or the empty value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateAndTimeValue(pub Option<DateTime<Utc>>);

impl DateAndTimeValue {
    /// The empty value.
    #[must_use]
    pub const fn empty() -> Self {
        Self(None)
    }

    /// Value for a UTC timestamp in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for timestamps outside the supported range.
    pub fn from_timestamp(timestamp: i64) -> Result<Self> {
        DateTime::from_timestamp(timestamp, 0)
            .map(|dt| Self(Some(dt)))
            .ok_or_else(|| Error::InvalidArgument(format!("timestamp {timestamp} out of range")))
    }

    /// Parses an RFC 850 string with a `UTC` or `GMT` zone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] when the string does not parse.
    pub fn from_rfc850(value: &str) -> Result<Self> {
        let naive = value
            .strip_suffix(" UTC")
            .or_else(|| value.strip_suffix(" GMT"))
            .ok_or_else(|| Error::Serialization(format!("unsupported time zone in '{value}'")))?;

        NaiveDateTime::parse_from_str(naive, RFC850_FORMAT)
            .map(|dt| Self(Some(dt.and_utc())))
            .map_err(|e| Error::Serialization(format!("invalid RFC 850 date '{value}': {e}")))
    }

    /// Whether this is the empty value.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// UTC timestamp, if set.
    #[must_use]
    pub fn timestamp(&self) -> Option<i64> {
        self.0.map(|dt| dt.timestamp())
    }

    /// Reads a hash; `None` yields the empty value.
    ///
    /// # Errors
    ///
    /// Returns an error when the RFC 850 string or the timestamp is invalid.
    pub fn from_hash(hash: Option<&DateTimeHash>) -> Result<Self> {
        let Some(hash) = hash else {
            return Ok(Self::empty());
        };
        match hash.rfc850.as_deref() {
            Some(rfc850) if !rfc850.is_empty() => Self::from_rfc850(rfc850),
            _ => Self::from_timestamp(hash.timestamp),
        }
    }

    /// Writes the hash; the empty value yields `None`.
    #[must_use]
    pub fn to_hash(&self) -> Option<DateTimeHash> {
        self.0.map(|dt| DateTimeHash {
            timestamp: dt.timestamp(),
            rfc850: Some(format!("{} UTC", dt.format(RFC850_FORMAT))),
        })
    }
}

/// Indexes date-and-time values as UTC timestamps.
#[derive(Debug, Default)]
pub struct DateTimeEncoder;

impl FieldTypeEncoder for DateTimeEncoder {
    fn kind(&self) -> FieldKind {
        FieldKind::Date
    }

    fn index_values(&self, value: &FieldValue) -> Result<Vec<IndexValue>> {
        match value {
            FieldValue::DateTime(dt) => {
                Ok(dt.timestamp().map(IndexValue::Date).into_iter().collect())
            }
            FieldValue::Integer(timestamp) => Ok(vec![IndexValue::Date(*timestamp)]),
            other => Err(super::mismatch(self.kind(), other)),
        }
    }

    fn decode(&self, values: &[IndexValue]) -> Option<FieldValue> {
        let timestamp = values.first()?.as_i64()?;
        DateAndTimeValue::from_timestamp(timestamp)
            .ok()
            .map(FieldValue::DateTime)
    }
}
