//! Builder methods for creating Criterion instances.

use super::{
    ContentIdCriterion, Criterion, CustomFieldCriterion, FieldCriterion, FullTextCriterion,
    LanguageCodeCriterion, MapLocationDistanceCriterion, MetadataCriterion, MetadataTarget,
};
use crate::error::Result;
use crate::operator::Operator;
use crate::value::CriterionValue;

impl Criterion {
    /// Creates a logical AND of the given criteria.
    #[must_use]
    pub fn and(criteria: Vec<Criterion>) -> Self {
        Self::LogicalAnd { criteria }
    }

    /// Creates a logical OR of the given criteria.
    #[must_use]
    pub fn or(criteria: Vec<Criterion>) -> Self {
        Self::LogicalOr { criteria }
    }

    /// Creates a logical NOT of the given criterion.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(criterion: Criterion) -> Self {
        Self::LogicalNot {
            criterion: Box::new(criterion),
        }
    }

    /// Matches contents with one of the given ids.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty id list.
    pub fn content_ids(ids: impl Into<CriterionValue>) -> Result<Self> {
        ContentIdCriterion::new(Operator::In, ids).map(Self::ContentId)
    }

    /// Matches the content with the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is neither an integer nor a string.
    pub fn content_id(id: impl Into<CriterionValue>) -> Result<Self> {
        ContentIdCriterion::new(Operator::Eq, id).map(Self::ContentId)
    }

    /// Creates a metadata predicate.
    ///
    /// # Errors
    ///
    /// See [`MetadataCriterion::new`].
    pub fn metadata(
        target: MetadataTarget,
        operator: Operator,
        value: impl Into<CriterionValue>,
    ) -> Result<Self> {
        MetadataCriterion::new(target, operator, value).map(Self::Metadata)
    }

    /// Matches contents of one of the given content types.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty list.
    pub fn content_type_identifier(identifiers: impl Into<CriterionValue>) -> Result<Self> {
        Self::metadata(MetadataTarget::ContentTypeIdentifier, Operator::In, identifiers)
    }

    /// Matches contents with a location below one of the given path strings.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty list or a malformed path string.
    pub fn subtree(path_strings: impl Into<CriterionValue>) -> Result<Self> {
        Self::metadata(MetadataTarget::Subtree, Operator::In, path_strings)
    }

    /// Matches contents translated into one of the given languages.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty list.
    pub fn language_code(
        codes: impl Into<CriterionValue>,
        match_always_available: bool,
    ) -> Result<Self> {
        LanguageCodeCriterion::new(Operator::In, codes)
            .map(|c| c.with_match_always_available(match_always_available))
            .map(Self::LanguageCode)
    }

    /// Creates a field predicate.
    ///
    /// # Errors
    ///
    /// See [`FieldCriterion::new`].
    pub fn field(
        identifier: impl Into<String>,
        operator: Operator,
        value: impl Into<CriterionValue>,
    ) -> Result<Self> {
        FieldCriterion::new(identifier, operator, value).map(Self::Field)
    }

    /// Creates a custom (physical) field predicate.
    ///
    /// # Errors
    ///
    /// See [`CustomFieldCriterion::new`].
    pub fn custom_field(
        physical_field: impl Into<String>,
        operator: Operator,
        value: impl Into<CriterionValue>,
    ) -> Result<Self> {
        CustomFieldCriterion::new(physical_field, operator, value).map(Self::CustomField)
    }

    /// Creates a full-text predicate.
    ///
    /// # Errors
    ///
    /// Returns an error when the text is blank.
    pub fn full_text(text: impl Into<String>) -> Result<Self> {
        FullTextCriterion::new(text).map(Self::FullText)
    }

    /// Creates a map-location distance predicate (kilometres).
    ///
    /// # Errors
    ///
    /// See [`MapLocationDistanceCriterion::new`].
    pub fn map_location_distance(
        identifier: impl Into<String>,
        operator: Operator,
        distance_km: impl Into<CriterionValue>,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self> {
        MapLocationDistanceCriterion::new(identifier, operator, distance_km, latitude, longitude)
            .map(Self::MapLocationDistance)
    }
}
