//! Leaf predicates and their operator specification tables.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::operator::{Operator, Specification, Specifications, ValueFormat, ValueTypes};
use crate::value::{CriterionValue, Scalar};

const ID_TYPES: ValueTypes = ValueTypes::INTEGER.union(ValueTypes::STRING);
const NUMBER_TYPES: ValueTypes = ValueTypes::INTEGER.union(ValueTypes::FLOAT);

const ID_TABLE: &[Specification] = &[
    Specification::new(Operator::In, ValueFormat::Array).with_types(ID_TYPES),
    Specification::new(Operator::Eq, ValueFormat::Single).with_types(ID_TYPES),
];

const STRING_ID_TABLE: &[Specification] = &[
    Specification::new(Operator::In, ValueFormat::Array).with_types(ValueTypes::STRING),
    Specification::new(Operator::Eq, ValueFormat::Single).with_types(ValueTypes::STRING),
];

const DATE_TABLE: &[Specification] = &[
    Specification::new(Operator::Eq, ValueFormat::Single).with_types(ValueTypes::INTEGER),
    Specification::new(Operator::Gt, ValueFormat::Single).with_types(ValueTypes::INTEGER),
    Specification::new(Operator::Gte, ValueFormat::Single).with_types(ValueTypes::INTEGER),
    Specification::new(Operator::Lt, ValueFormat::Single).with_types(ValueTypes::INTEGER),
    Specification::new(Operator::Lte, ValueFormat::Single).with_types(ValueTypes::INTEGER),
    Specification::new(Operator::In, ValueFormat::Array).with_types(ValueTypes::INTEGER),
    Specification::new(Operator::Between, ValueFormat::Array)
        .with_types(ValueTypes::INTEGER)
        .with_count(2),
];

const FIELD_TABLE: &[Specification] = &[
    Specification::new(Operator::In, ValueFormat::Array),
    Specification::new(Operator::Eq, ValueFormat::Single),
    Specification::new(Operator::Gt, ValueFormat::Single),
    Specification::new(Operator::Gte, ValueFormat::Single),
    Specification::new(Operator::Lt, ValueFormat::Single),
    Specification::new(Operator::Lte, ValueFormat::Single),
    Specification::new(Operator::Like, ValueFormat::Single),
    Specification::new(Operator::Contains, ValueFormat::Single),
    Specification::new(Operator::Between, ValueFormat::Array).with_count(2),
];

const FULL_TEXT_TABLE: &[Specification] =
    &[Specification::new(Operator::Like, ValueFormat::Single).with_types(ValueTypes::STRING)];

const DISTANCE_TABLE: &[Specification] = &[
    Specification::new(Operator::Gt, ValueFormat::Single).with_types(NUMBER_TYPES),
    Specification::new(Operator::Gte, ValueFormat::Single).with_types(NUMBER_TYPES),
    Specification::new(Operator::Lt, ValueFormat::Single).with_types(NUMBER_TYPES),
    Specification::new(Operator::Lte, ValueFormat::Single).with_types(NUMBER_TYPES),
    Specification::new(Operator::Between, ValueFormat::Array)
        .with_types(NUMBER_TYPES)
        .with_count(2),
];

/// Per-content-type physical field overrides for one criterion.
///
/// Keyed by content type identifier, then field identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CustomFields(BTreeMap<String, BTreeMap<String, String>>);

impl CustomFields {
    /// Creates an empty override set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the physical field used for `(content_type, field_identifier)`.
    pub fn insert(
        &mut self,
        content_type: impl Into<String>,
        field_identifier: impl Into<String>,
        physical_field: impl Into<String>,
    ) {
        self.0
            .entry(content_type.into())
            .or_default()
            .insert(field_identifier.into(), physical_field.into());
    }

    /// Returns the override for an exact `(content_type, field_identifier)` pair.
    #[must_use]
    pub fn get(&self, content_type: &str, field_identifier: &str) -> Option<&str> {
        self.0
            .get(content_type)
            .and_then(|fields| fields.get(field_identifier))
            .map(String::as_str)
    }

    /// Content types holding an override for the field identifier.
    pub fn content_types_for<'a>(
        &'a self,
        field_identifier: &'a str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(_, fields)| fields.contains_key(field_identifier))
            .map(|(content_type, _)| content_type.as_str())
    }

    /// Returns true when no override is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn validated(
    specs: Specifications,
    target: &str,
    operator: Operator,
    value: CriterionValue,
) -> Result<CriterionValue> {
    specs.validate(target, operator, &value)?;
    Ok(value)
}

/// Content id predicate (`IN`, `EQ`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentIdCriterion {
    operator: Operator,
    value: CriterionValue,
}

impl ContentIdCriterion {
    /// Operator table.
    pub const SPECIFICATIONS: Specifications = Specifications::new("ContentId", ID_TABLE);

    /// Builds a validated content id predicate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperator`] or [`Error::InvalidArgument`] when the operator or
    /// value does not match [`Self::SPECIFICATIONS`].
    pub fn new(operator: Operator, value: impl Into<CriterionValue>) -> Result<Self> {
        let value = validated(Self::SPECIFICATIONS, "id", operator, value.into())?;
        Ok(Self { operator, value })
    }

    /// Operator.
    #[must_use]
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Value.
    #[must_use]
    pub fn value(&self) -> &CriterionValue {
        &self.value
    }
}

/// Content metadata attribute targeted by a [`MetadataCriterion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataTarget {
    /// Numeric content type id.
    ContentTypeId,
    /// Content type identifier, e.g. `folder`.
    ContentTypeIdentifier,
    /// Section id.
    SectionId,
    /// Content remote id.
    RemoteId,
    /// Id of any location of the content.
    LocationId,
    /// Parent id of any location of the content.
    ParentLocationId,
    /// Remote id of any location of the content.
    LocationRemoteId,
    /// Path string prefix of any location, e.g. `/1/2/`.
    Subtree,
    /// Last modification timestamp (seconds).
    DateModified,
    /// Publication timestamp (seconds).
    DatePublished,
}

impl MetadataTarget {
    /// Operator table for this target.
    #[must_use]
    pub const fn specifications(self) -> Specifications {
        match self {
            Self::ContentTypeId => Specifications::new("ContentTypeId", ID_TABLE),
            Self::SectionId => Specifications::new("SectionId", ID_TABLE),
            Self::LocationId => Specifications::new("LocationId", ID_TABLE),
            Self::ParentLocationId => Specifications::new("ParentLocationId", ID_TABLE),
            Self::ContentTypeIdentifier => {
                Specifications::new("ContentTypeIdentifier", STRING_ID_TABLE)
            }
            Self::RemoteId => Specifications::new("RemoteId", STRING_ID_TABLE),
            Self::LocationRemoteId => Specifications::new("LocationRemoteId", STRING_ID_TABLE),
            Self::Subtree => Specifications::new("Subtree", STRING_ID_TABLE),
            Self::DateModified => Specifications::new("DateModified", DATE_TABLE),
            Self::DatePublished => Specifications::new("DatePublished", DATE_TABLE),
        }
    }

    /// Name of the criterion kind, as used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.specifications().criterion()
    }
}

/// Predicate on a content metadata attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataCriterion {
    target: MetadataTarget,
    operator: Operator,
    value: CriterionValue,
}

impl MetadataCriterion {
    /// Builds a validated metadata predicate.
    ///
    /// Subtree values must be path strings starting and ending with `/`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperator`] or [`Error::InvalidArgument`] when the operator or
    /// value does not match the target's table.
    pub fn new(
        target: MetadataTarget,
        operator: Operator,
        value: impl Into<CriterionValue>,
    ) -> Result<Self> {
        let value = validated(target.specifications(), target.name(), operator, value.into())?;

        if target == MetadataTarget::Subtree {
            for scalar in value.scalars() {
                if let Scalar::String(path) = scalar {
                    if !path.starts_with('/') || !path.ends_with('/') {
                        return Err(Error::InvalidArgument(format!(
                            "Subtree: invalid path string '{path}'"
                        )));
                    }
                }
            }
        }

        Ok(Self {
            target,
            operator,
            value,
        })
    }

    /// Target attribute.
    #[must_use]
    pub fn target(&self) -> MetadataTarget {
        self.target
    }

    /// Operator.
    #[must_use]
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Value.
    #[must_use]
    pub fn value(&self) -> &CriterionValue {
        &self.value
    }
}

/// Matches contents translated into one of the given languages.
///
/// With `match_always_available` set (the default), always-available contents match
/// regardless of their languages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageCodeCriterion {
    operator: Operator,
    value: CriterionValue,
    match_always_available: bool,
}

impl LanguageCodeCriterion {
    /// Operator table.
    pub const SPECIFICATIONS: Specifications =
        Specifications::new("LanguageCode", STRING_ID_TABLE);

    /// Builds a validated language code predicate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperator`] or [`Error::InvalidArgument`] when the operator or
    /// value does not match [`Self::SPECIFICATIONS`].
    pub fn new(operator: Operator, value: impl Into<CriterionValue>) -> Result<Self> {
        let value = validated(Self::SPECIFICATIONS, "language_code", operator, value.into())?;
        Ok(Self {
            operator,
            value,
            match_always_available: true,
        })
    }

    /// Sets whether always-available contents match.
    #[must_use]
    pub fn with_match_always_available(mut self, match_always_available: bool) -> Self {
        self.match_always_available = match_always_available;
        self
    }

    /// Operator.
    #[must_use]
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Value.
    #[must_use]
    pub fn value(&self) -> &CriterionValue {
        &self.value
    }

    /// Whether always-available contents match.
    #[must_use]
    pub fn match_always_available(&self) -> bool {
        self.match_always_available
    }
}

/// Predicate on a content-type field, addressed by field identifier.
///
/// The physical field is resolved per content type through the field registry unless an
/// override is set with [`FieldCriterion::with_custom_field`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldCriterion {
    target: String,
    operator: Operator,
    value: CriterionValue,
    custom_fields: CustomFields,
}

impl FieldCriterion {
    /// Operator table.
    pub const SPECIFICATIONS: Specifications = Specifications::new("Field", FIELD_TABLE);

    /// Builds a validated field predicate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperator`] or [`Error::InvalidArgument`] when the operator or
    /// value does not match [`Self::SPECIFICATIONS`].
    pub fn new(
        target: impl Into<String>,
        operator: Operator,
        value: impl Into<CriterionValue>,
    ) -> Result<Self> {
        let target = target.into();
        if target.is_empty() {
            return Err(Error::InvalidArgument(
                "Field: field identifier must not be empty".into(),
            ));
        }
        let value = validated(Self::SPECIFICATIONS, &target, operator, value.into())?;
        Ok(Self {
            target,
            operator,
            value,
            custom_fields: CustomFields::new(),
        })
    }

    /// Overrides the physical field for one `(content_type, field_identifier)` pair.
    #[must_use]
    pub fn with_custom_field(
        mut self,
        content_type: impl Into<String>,
        field_identifier: impl Into<String>,
        physical_field: impl Into<String>,
    ) -> Self {
        self.custom_fields
            .insert(content_type, field_identifier, physical_field);
        self
    }

    /// Field identifier.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Operator.
    #[must_use]
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Value.
    #[must_use]
    pub fn value(&self) -> &CriterionValue {
        &self.value
    }

    /// Physical field overrides.
    #[must_use]
    pub fn custom_fields(&self) -> &CustomFields {
        &self.custom_fields
    }
}

/// Predicate on a physical index field, used verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomFieldCriterion {
    target: String,
    operator: Operator,
    value: CriterionValue,
}

impl CustomFieldCriterion {
    /// Operator table.
    pub const SPECIFICATIONS: Specifications = Specifications::new("CustomField", FIELD_TABLE);

    /// Builds a validated custom field predicate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperator`] or [`Error::InvalidArgument`] when the operator or
    /// value does not match [`Self::SPECIFICATIONS`].
    pub fn new(
        target: impl Into<String>,
        operator: Operator,
        value: impl Into<CriterionValue>,
    ) -> Result<Self> {
        let target = target.into();
        if target.is_empty() {
            return Err(Error::InvalidArgument(
                "CustomField: physical field name must not be empty".into(),
            ));
        }
        let value = validated(Self::SPECIFICATIONS, &target, operator, value.into())?;
        Ok(Self {
            target,
            operator,
            value,
        })
    }

    /// Physical field name.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Operator.
    #[must_use]
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Value.
    #[must_use]
    pub fn value(&self) -> &CriterionValue {
        &self.value
    }
}

/// Full-text predicate.
///
/// Every word of the text must occur in the content's text; a word ending in `*` matches
/// as a prefix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullTextCriterion {
    text: String,
}

impl FullTextCriterion {
    /// Operator table.
    pub const SPECIFICATIONS: Specifications =
        Specifications::new("FullText", FULL_TEXT_TABLE);

    /// Builds a full-text predicate with an explicit operator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperator`] for any operator but `LIKE`, and
    /// [`Error::InvalidArgument`] for non-string or blank values.
    pub fn with_operator(operator: Operator, value: impl Into<CriterionValue>) -> Result<Self> {
        let value = validated(Self::SPECIFICATIONS, "text", operator, value.into())?;
        match value {
            CriterionValue::Single(Scalar::String(text)) if !text.trim().is_empty() => {
                Ok(Self { text })
            }
            _ => Err(Error::InvalidArgument(
                "FullText: search text must not be blank".into(),
            )),
        }
    }

    /// Builds a `LIKE` full-text predicate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when the text is blank.
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text: String = text.into();
        Self::with_operator(Operator::Like, text)
    }

    /// Operator (always `LIKE`).
    #[must_use]
    pub fn operator(&self) -> Operator {
        Operator::Like
    }

    /// Search text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Distance of a map-location field from an origin, in kilometres.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLocationDistanceCriterion {
    target: String,
    operator: Operator,
    value: CriterionValue,
    latitude: f64,
    longitude: f64,
    custom_fields: CustomFields,
}

impl MapLocationDistanceCriterion {
    /// Operator table.
    pub const SPECIFICATIONS: Specifications =
        Specifications::new("MapLocationDistance", DISTANCE_TABLE);

    /// Builds a validated distance predicate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperator`] or [`Error::InvalidArgument`] when the operator or
    /// value does not match [`Self::SPECIFICATIONS`], when a distance is negative or when the
    /// origin is outside valid coordinates.
    pub fn new(
        target: impl Into<String>,
        operator: Operator,
        distance_km: impl Into<CriterionValue>,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self> {
        let target = target.into();
        let value = validated(Self::SPECIFICATIONS, &target, operator, distance_km.into())?;

        if value.scalars().any(|s| s.as_f64().is_some_and(|d| d < 0.0)) {
            return Err(Error::InvalidArgument(format!(
                "{target}: distance must not be negative"
            )));
        }
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::InvalidArgument(format!(
                "{target}: invalid origin ({latitude}, {longitude})"
            )));
        }

        Ok(Self {
            target,
            operator,
            value,
            latitude,
            longitude,
            custom_fields: CustomFields::new(),
        })
    }

    /// Overrides the physical field for one `(content_type, field_identifier)` pair.
    #[must_use]
    pub fn with_custom_field(
        mut self,
        content_type: impl Into<String>,
        field_identifier: impl Into<String>,
        physical_field: impl Into<String>,
    ) -> Self {
        self.custom_fields
            .insert(content_type, field_identifier, physical_field);
        self
    }

    /// Field identifier.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Operator.
    #[must_use]
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Distance value(s) in kilometres.
    #[must_use]
    pub fn value(&self) -> &CriterionValue {
        &self.value
    }

    /// Origin latitude.
    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Origin longitude.
    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Physical field overrides.
    #[must_use]
    pub fn custom_fields(&self) -> &CustomFields {
        &self.custom_fields
    }
}
