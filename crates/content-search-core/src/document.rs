//! Index documents: flat field name to values mappings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One value stored in an index field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexValue {
    /// Exact string.
    String(String),
    /// Integer.
    Integer(i64),
    /// Float.
    Float(f64),
    /// Boolean.
    Boolean(bool),
    /// UTC timestamp in seconds.
    Date(i64),
    /// Geographic point.
    GeoPoint {
        /// Latitude in degrees.
        lat: f64,
        /// Longitude in degrees.
        lon: f64,
    },
}

impl IndexValue {
    /// Numeric view of integers, floats and dates.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) | Self::Date(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Integer view of integers and dates.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) | Self::Date(i) => Some(*i),
            _ => None,
        }
    }

    /// String view.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean view.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for IndexValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Integer(i) | Self::Date(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::GeoPoint { lat, lon } => write!(f, "{lat},{lon}"),
        }
    }
}

impl From<&str> for IndexValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<String> for IndexValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<i64> for IndexValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<bool> for IndexValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

/// A flat index document. One document per content object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document id.
    pub id: String,
    /// Field name to values; multi-valued fields keep insertion order.
    pub fields: BTreeMap<String, Vec<IndexValue>>,
}

impl Document {
    /// Creates an empty document.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Appends one value to a field.
    pub fn add(&mut self, field: impl Into<String>, value: impl Into<IndexValue>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(value.into());
    }

    /// Appends several values to a field.
    pub fn extend(
        &mut self,
        field: impl Into<String>,
        values: impl IntoIterator<Item = IndexValue>,
    ) {
        self.fields.entry(field.into()).or_default().extend(values);
    }

    /// Values of a field; empty when absent.
    #[must_use]
    pub fn get(&self, field: &str) -> &[IndexValue] {
        self.fields.get(field).map_or(&[], Vec::as_slice)
    }

    /// First value of a field.
    #[must_use]
    pub fn first(&self, field: &str) -> Option<&IndexValue> {
        self.get(field).first()
    }

    /// Whether the field holds at least one value.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        !self.get(field).is_empty()
    }
}

/// Names of the system fields every document carries.
pub mod names {
    /// Content id.
    pub const ID: &str = "id";
    /// Content type id.
    pub const TYPE: &str = "type";
    /// Content type identifier.
    pub const TYPE_IDENTIFIER: &str = "type_identifier";
    /// Version number.
    pub const VERSION: &str = "version";
    /// Version status code.
    pub const STATUS: &str = "status";
    /// Content name.
    pub const NAME: &str = "name";
    /// Creator id.
    pub const CREATOR: &str = "creator";
    /// Section id.
    pub const SECTION: &str = "section";
    /// Content remote id.
    pub const REMOTE_ID: &str = "remote_id";
    /// Modification timestamp.
    pub const MODIFIED: &str = "modified";
    /// Publication timestamp.
    pub const PUBLISHED: &str = "published";
    /// Main language code.
    pub const MAIN_LANGUAGE_CODE: &str = "main_language_code";
    /// Always-available flag.
    pub const ALWAYS_AVAILABLE: &str = "always_available";
    /// Translation languages (multi-valued).
    pub const LANGUAGE_CODE: &str = "language_code";
    /// Location path strings (multi-valued).
    pub const PATH: &str = "path";
    /// Location ids (multi-valued).
    pub const LOCATION: &str = "location";
    /// Location depths (multi-valued).
    pub const DEPTH: &str = "depth";
    /// Parent location ids (multi-valued).
    pub const LOCATION_PARENT: &str = "location_parent";
    /// Location remote ids (multi-valued).
    pub const LOCATION_REMOTE_ID: &str = "location_remote_id";
    /// Prefix of the aggregated full-text fields.
    pub const TEXT: &str = "text";
}
