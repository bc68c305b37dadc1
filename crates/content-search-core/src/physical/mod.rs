//! Physical query model.
//!
//! The translator lowers criteria and sort clauses into this model, which talks only
//! about physical index fields. Backends evaluate it; [`matching`] holds the reference
//! evaluation used by the in-memory backend.

pub mod matching;

use serde::{Deserialize, Serialize};

use crate::document::{Document, IndexValue};
use crate::sort_clause::SortDirection;

/// A query over physical index fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PhysicalQuery {
    /// Matches every document.
    MatchAll,
    /// Matches no document.
    MatchNone,
    /// Some value of the field equals the value.
    Term {
        /// Field name.
        field: String,
        /// Value.
        value: IndexValue,
    },
    /// Some value of the field equals one of the values.
    Terms {
        /// Field name.
        field: String,
        /// Values.
        values: Vec<IndexValue>,
    },
    /// Some value of the field lies within the bounds.
    Range {
        /// Field name.
        field: String,
        /// Lower bound, if any.
        lower: Option<IndexValue>,
        /// Upper bound, if any.
        upper: Option<IndexValue>,
        /// Whether the lower bound is inclusive.
        include_lower: bool,
        /// Whether the upper bound is inclusive.
        include_upper: bool,
    },
    /// Some string value of the field matches the pattern (`*` and `?` wildcards).
    Wildcard {
        /// Field name.
        field: String,
        /// Pattern.
        pattern: String,
    },
    /// Every word of the text occurs in the union of the fields.
    FullText {
        /// Text fields to search.
        fields: Vec<String>,
        /// Search text.
        text: String,
    },
    /// Some point of the field lies within the distance bounds, in kilometres.
    GeoDistance {
        /// Field name.
        field: String,
        /// Origin latitude.
        latitude: f64,
        /// Origin longitude.
        longitude: f64,
        /// Minimum distance.
        min_km: Option<f64>,
        /// Maximum distance.
        max_km: Option<f64>,
        /// Whether the minimum is inclusive.
        include_min: bool,
        /// Whether the maximum is inclusive.
        include_max: bool,
    },
    /// The field holds at least one value.
    Exists {
        /// Field name.
        field: String,
    },
    /// Every child matches.
    And {
        /// Children.
        queries: Vec<PhysicalQuery>,
    },
    /// At least one child matches.
    Or {
        /// Children.
        queries: Vec<PhysicalQuery>,
    },
    /// The child does not match.
    Not {
        /// Child.
        query: Box<PhysicalQuery>,
    },
}

impl PhysicalQuery {
    /// Conjunction, simplified: match-all children are dropped, a match-none child wins,
    /// an empty list is match-all and a single child is returned as is.
    #[must_use]
    pub fn and(queries: Vec<PhysicalQuery>) -> Self {
        let mut kept = Vec::with_capacity(queries.len());
        for query in queries {
            match query {
                Self::MatchAll => {}
                Self::MatchNone => return Self::MatchNone,
                Self::And { queries: nested } => kept.extend(nested),
                other => kept.push(other),
            }
        }
        match kept.len() {
            0 => Self::MatchAll,
            1 => kept.swap_remove(0),
            _ => Self::And { queries: kept },
        }
    }

    /// Disjunction, simplified: match-none children are dropped, a match-all child wins,
    /// an empty list is match-none and a single child is returned as is.
    #[must_use]
    pub fn or(queries: Vec<PhysicalQuery>) -> Self {
        let mut kept = Vec::with_capacity(queries.len());
        for query in queries {
            match query {
                Self::MatchNone => {}
                Self::MatchAll => return Self::MatchAll,
                Self::Or { queries: nested } => kept.extend(nested),
                other => kept.push(other),
            }
        }
        match kept.len() {
            0 => Self::MatchNone,
            1 => kept.swap_remove(0),
            _ => Self::Or { queries: kept },
        }
    }

    /// Negation, simplified for the constants and double negation.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(query: PhysicalQuery) -> Self {
        match query {
            Self::MatchAll => Self::MatchNone,
            Self::MatchNone => Self::MatchAll,
            Self::Not { query } => *query,
            other => Self::Not {
                query: Box::new(other),
            },
        }
    }

    /// Equality on one field.
    #[must_use]
    pub fn term(field: impl Into<String>, value: impl Into<IndexValue>) -> Self {
        Self::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Membership on one field.
    #[must_use]
    pub fn terms(field: impl Into<String>, values: Vec<IndexValue>) -> Self {
        Self::Terms {
            field: field.into(),
            values,
        }
    }

    /// Whether any document could match.
    #[must_use]
    pub fn is_match_none(&self) -> bool {
        matches!(self, Self::MatchNone)
    }

    /// Physical fields referenced anywhere in the query, in first-seen order.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        fn push<'a>(out: &mut Vec<&'a str>, field: &'a str) {
            if !out.contains(&field) {
                out.push(field);
            }
        }
        match self {
            Self::MatchAll | Self::MatchNone => {}
            Self::Term { field, .. }
            | Self::Terms { field, .. }
            | Self::Range { field, .. }
            | Self::Wildcard { field, .. }
            | Self::GeoDistance { field, .. }
            | Self::Exists { field } => push(out, field),
            Self::FullText { fields, .. } => {
                for field in fields {
                    push(out, field);
                }
            }
            Self::And { queries } | Self::Or { queries } => {
                for query in queries {
                    query.collect_fields(out);
                }
            }
            Self::Not { query } => query.collect_fields(out),
        }
    }

    /// Whether the query matches the document.
    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        matching::evaluate(self, doc).is_some()
    }
}

/// One physical sort key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PhysicalSort {
    /// By field value. Ascending uses a document's smallest value, descending its largest.
    Field {
        /// Field name.
        field: String,
        /// Direction.
        direction: SortDirection,
    },
    /// By distance of the field's nearest point from an origin.
    GeoDistance {
        /// Field name.
        field: String,
        /// Origin latitude.
        latitude: f64,
        /// Origin longitude.
        longitude: f64,
        /// Direction.
        direction: SortDirection,
    },
    /// By relevance score.
    Score {
        /// Direction.
        direction: SortDirection,
    },
}

/// A facet to compute over the full matching set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetRequest {
    /// Facet name.
    pub name: String,
    /// Field counted.
    pub field: String,
    /// Maximum number of entries.
    pub limit: usize,
}

/// Facet counts, most frequent first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    /// Facet name.
    pub name: String,
    /// `(value, count)` pairs.
    pub entries: Vec<(String, usize)>,
}

/// A fully translated search request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Non-scoring restriction.
    pub filter: PhysicalQuery,
    /// Scoring restriction.
    pub query: PhysicalQuery,
    /// Sort keys, highest priority first. Empty means score descending.
    pub sort: Vec<PhysicalSort>,
    /// Hits to skip.
    pub offset: usize,
    /// Maximum hits returned.
    pub limit: usize,
    /// Facets to compute.
    pub facets: Vec<FacetRequest>,
    /// Execution budget in milliseconds.
    pub timeout_ms: u64,
}

impl SearchRequest {
    /// Request matching everything, unsorted, with the given limit.
    #[must_use]
    pub fn match_all(limit: usize, timeout_ms: u64) -> Self {
        Self {
            filter: PhysicalQuery::MatchAll,
            query: PhysicalQuery::MatchAll,
            sort: Vec::new(),
            offset: 0,
            limit,
            facets: Vec::new(),
            timeout_ms,
        }
    }
}
