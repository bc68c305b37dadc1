//! Criterion model.
//!
//! A [`Criterion`] is a tree of typed predicates over content. Leaves compare a target
//! (a content field, a metadata attribute, the full text) with a value using an
//! [`Operator`]; composites combine children with AND, OR and NOT.
//!
//! Leaves are validated against their static specification table when they are built, so
//! an operator outside the table or a value of the wrong shape never reaches translation.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use content_search_core::criterion::{Criterion, FieldCriterion};
//! use content_search_core::operator::Operator;
//!
//! let criterion = Criterion::and(vec![
//!     Criterion::content_type_identifier(vec!["folder"])?,
//!     FieldCriterion::new("name", Operator::Eq, "Products")?
//!         .with_custom_field("folder", "name", "folder_name_value_s")
//!         .into(),
//! ]);
//! ```

mod builders;
mod leaves;

pub use leaves::{
    ContentIdCriterion, CustomFieldCriterion, CustomFields, FieldCriterion, FullTextCriterion,
    LanguageCodeCriterion, MapLocationDistanceCriterion, MetadataCriterion, MetadataTarget,
};

use serde::Serialize;

use crate::operator::{Operator, Specifications};

/// A node of the criterion tree.
///
/// The enum is closed; translation has one arm per variant. Nodes have no setters, a
/// criterion is immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Criterion {
    /// Matches every content.
    MatchAll,
    /// Matches no content.
    MatchNone,
    /// Content id comparison.
    ContentId(ContentIdCriterion),
    /// Comparison on a content metadata attribute.
    Metadata(MetadataCriterion),
    /// Restricts to contents translated into the given languages.
    LanguageCode(LanguageCodeCriterion),
    /// Comparison on a content-type field, resolved through the field registry.
    Field(FieldCriterion),
    /// Comparison on a physical index field, bypassing the field registry.
    CustomField(CustomFieldCriterion),
    /// Full-text match against the aggregated text of a content.
    FullText(FullTextCriterion),
    /// Distance of a map-location field from an origin point.
    MapLocationDistance(MapLocationDistanceCriterion),
    /// All children must match; an empty list matches everything.
    LogicalAnd {
        /// Children, in order.
        criteria: Vec<Criterion>,
    },
    /// At least one child must match; an empty list matches nothing.
    LogicalOr {
        /// Children, in order.
        criteria: Vec<Criterion>,
    },
    /// The child must not match.
    LogicalNot {
        /// Negated child.
        criterion: Box<Criterion>,
    },
}

impl Criterion {
    /// Returns the specification table of a leaf, or `None` for composites and the
    /// match-all/match-none constants.
    #[must_use]
    pub fn specifications(&self) -> Option<Specifications> {
        match self {
            Self::ContentId(_) => Some(ContentIdCriterion::SPECIFICATIONS),
            Self::Metadata(c) => Some(c.target().specifications()),
            Self::LanguageCode(_) => Some(LanguageCodeCriterion::SPECIFICATIONS),
            Self::Field(_) => Some(FieldCriterion::SPECIFICATIONS),
            Self::CustomField(_) => Some(CustomFieldCriterion::SPECIFICATIONS),
            Self::FullText(_) => Some(FullTextCriterion::SPECIFICATIONS),
            Self::MapLocationDistance(_) => Some(MapLocationDistanceCriterion::SPECIFICATIONS),
            Self::MatchAll
            | Self::MatchNone
            | Self::LogicalAnd { .. }
            | Self::LogicalOr { .. }
            | Self::LogicalNot { .. } => None,
        }
    }

    /// Returns the operators this node accepts; empty for composites.
    #[must_use]
    pub fn supported_operators(&self) -> Vec<Operator> {
        self.specifications()
            .map(|s| s.supported_operators().collect())
            .unwrap_or_default()
    }

    /// Returns true for leaf predicates.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.specifications().is_some()
    }

    /// Number of nodes in the tree, this one included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        match self {
            Self::LogicalAnd { criteria } | Self::LogicalOr { criteria } => {
                1 + criteria.iter().map(Self::node_count).sum::<usize>()
            }
            Self::LogicalNot { criterion } => 1 + criterion.node_count(),
            _ => 1,
        }
    }
}

macro_rules! criterion_from {
    ($($leaf:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$leaf> for Criterion {
                fn from(leaf: $leaf) -> Self {
                    Self::$variant(leaf)
                }
            }
        )*
    };
}

criterion_from! {
    ContentIdCriterion => ContentId,
    MetadataCriterion => Metadata,
    LanguageCodeCriterion => LanguageCode,
    FieldCriterion => Field,
    CustomFieldCriterion => CustomField,
    FullTextCriterion => FullText,
    MapLocationDistanceCriterion => MapLocationDistance,
}
