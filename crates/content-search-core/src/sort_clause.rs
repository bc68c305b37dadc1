//! Sort clauses.
//!
//! Clauses are applied in list order: the first clause has the highest priority and
//! later clauses only break its ties.

use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    /// Ascending (default).
    #[default]
    Asc,
    /// Descending.
    Desc,
}

/// What a sort clause orders by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum SortTarget {
    /// Content id.
    ContentId,
    /// Content name.
    ContentName,
    /// Last modification date.
    DateModified,
    /// Publication date.
    DatePublished,
    /// Section id.
    SectionId,
    /// Depth of the content's locations.
    LocationDepth,
    /// Path string of the content's locations.
    LocationPath,
    /// Relevance score.
    Score,
    /// A content-type field in an explicit language.
    Field {
        /// Content type identifier.
        content_type: String,
        /// Field identifier.
        field: String,
        /// Language code; `None` sorts by the main-language value.
        language: Option<String>,
    },
    /// Distance of a map-location field from an origin.
    MapLocationDistance {
        /// Content type identifier.
        content_type: String,
        /// Field identifier.
        field: String,
        /// Origin latitude.
        latitude: f64,
        /// Origin longitude.
        longitude: f64,
        /// Language code; `None` uses the main-language value.
        language: Option<String>,
    },
}

/// A sort target with a direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortClause {
    /// What to sort by.
    #[serde(flatten)]
    pub target: SortTarget,
    /// Direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortClause {
    /// Creates a clause.
    #[must_use]
    pub fn new(target: SortTarget, direction: SortDirection) -> Self {
        Self { target, direction }
    }

    /// Ascending clause.
    #[must_use]
    pub fn asc(target: SortTarget) -> Self {
        Self::new(target, SortDirection::Asc)
    }

    /// Descending clause.
    #[must_use]
    pub fn desc(target: SortTarget) -> Self {
        Self::new(target, SortDirection::Desc)
    }

    /// Sort by a field value in the given language.
    #[must_use]
    pub fn field(
        content_type: impl Into<String>,
        field: impl Into<String>,
        language: Option<&str>,
        direction: SortDirection,
    ) -> Self {
        Self::new(
            SortTarget::Field {
                content_type: content_type.into(),
                field: field.into(),
                language: language.map(str::to_owned),
            },
            direction,
        )
    }

    /// Sort by distance from an origin, measured on the given translation of the field
    /// (the main translation when `None`).
    #[must_use]
    pub fn map_location_distance(
        content_type: impl Into<String>,
        field: impl Into<String>,
        latitude: f64,
        longitude: f64,
        language: Option<&str>,
        direction: SortDirection,
    ) -> Self {
        Self::new(
            SortTarget::MapLocationDistance {
                content_type: content_type.into(),
                field: field.into(),
                latitude,
                longitude,
                language: language.map(str::to_owned),
            },
            direction,
        )
    }
}
