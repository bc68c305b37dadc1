//! Domain content as seen by the search subsystem.
//!
//! The content repository owns these objects; search only reads them when indexing and
//! rebuilds them from index documents when returning hits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::field_type::date_time::DateAndTimeValue;

/// Content metadata shared by every version and translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentInfo {
    /// Content id.
    pub id: i64,
    /// Numeric content type id.
    pub content_type_id: i64,
    /// Content type identifier, e.g. `folder`.
    pub content_type_identifier: String,
    /// Name in the main language.
    pub name: String,
    /// Section id.
    pub section_id: i64,
    /// Remote id.
    pub remote_id: String,
    /// Main language code.
    pub main_language_code: String,
    /// Whether the main translation is shown when no requested language exists.
    pub always_available: bool,
    /// Last modification.
    pub modification_date: DateTime<Utc>,
    /// First publication.
    pub publication_date: DateTime<Utc>,
}

/// Version status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionStatus {
    /// Not yet published.
    Draft,
    /// Published (default).
    #[default]
    Published,
    /// Replaced by a newer version.
    Archived,
}

impl VersionStatus {
    /// Numeric code stored in the index.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Draft => 0,
            Self::Published => 1,
            Self::Archived => 3,
        }
    }

    /// Status for a stored code.
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Draft),
            1 => Some(Self::Published),
            3 => Some(Self::Archived),
            _ => None,
        }
    }
}

/// The indexed version of a content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Version number.
    pub version_no: i64,
    /// Status.
    pub status: VersionStatus,
    /// Creator user id.
    pub creator_id: i64,
    /// Languages this version is translated into.
    pub language_codes: Vec<String>,
}

/// A tree location of a content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Location id.
    pub id: i64,
    /// Path string, e.g. `/1/2/54/`.
    pub path_string: String,
    /// Depth in the tree.
    pub depth: i64,
    /// Parent location id.
    pub parent_id: i64,
    /// Location remote id.
    pub remote_id: String,
}

/// Typed value of one field translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// String or text.
    Text(String),
    /// Integer.
    Integer(i64),
    /// Float.
    Float(f64),
    /// Boolean.
    Boolean(bool),
    /// Date and time, possibly empty.
    DateTime(DateAndTimeValue),
    /// Geographic point.
    MapLocation {
        /// Latitude in degrees.
        latitude: f64,
        /// Longitude in degrees.
        longitude: f64,
        /// Free-form address.
        address: Option<String>,
    },
}

impl FieldValue {
    /// Short name of the variant, for error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Boolean(_) => "boolean",
            Self::DateTime(_) => "date_time",
            Self::MapLocation { .. } => "map_location",
        }
    }
}

/// One translation of one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field identifier.
    pub identifier: String,
    /// Language of this translation.
    pub language_code: String,
    /// Value.
    pub value: FieldValue,
}

impl Field {
    /// Creates a field translation.
    #[must_use]
    pub fn new(
        identifier: impl Into<String>,
        language_code: impl Into<String>,
        value: FieldValue,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            language_code: language_code.into(),
            value,
        }
    }
}

/// A content object: metadata, the indexed version, its locations and field translations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Metadata.
    pub info: ContentInfo,
    /// Indexed version.
    pub version: VersionInfo,
    /// Locations.
    pub locations: Vec<Location>,
    /// Field translations. Search hits list them in language priority order.
    pub fields: Vec<Field>,
}

impl Content {
    /// Content id.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.info.id
    }

    /// Highest-priority translation of a field.
    #[must_use]
    pub fn field(&self, identifier: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.identifier == identifier)
    }

    /// Translation of a field in one language.
    #[must_use]
    pub fn field_in(&self, identifier: &str, language_code: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|f| f.identifier == identifier && f.language_code == language_code)
    }

    /// Whether the version has a translation in the language.
    #[must_use]
    pub fn has_language(&self, language_code: &str) -> bool {
        self.version
            .language_codes
            .iter()
            .any(|l| l == language_code)
    }
}
