//! Search query and request-scoped language filters.

use serde::{Deserialize, Serialize};

use crate::criterion::Criterion;
use crate::sort_clause::SortClause;

/// Facet requested alongside the hits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FacetBuilder {
    /// Counts per content type identifier.
    ContentType {
        /// Facet name in the result.
        name: String,
        /// Maximum number of entries.
        limit: usize,
    },
    /// Counts per section id.
    Section {
        /// Facet name in the result.
        name: String,
        /// Maximum number of entries.
        limit: usize,
    },
    /// Counts per translation language.
    Language {
        /// Facet name in the result.
        name: String,
        /// Maximum number of entries.
        limit: usize,
    },
}

impl FacetBuilder {
    /// Facet name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::ContentType { name, .. }
            | Self::Section { name, .. }
            | Self::Language { name, .. } => name,
        }
    }
}

/// A content search query.
///
/// `filter` restricts the result set without affecting relevance, `query` restricts it
/// and contributes to the score. Either may be absent, meaning "match all".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Query {
    /// Non-scoring restriction.
    pub filter: Option<Criterion>,
    /// Scoring restriction.
    pub query: Option<Criterion>,
    /// Sort clauses, highest priority first.
    pub sort_clauses: Vec<SortClause>,
    /// Number of hits to skip.
    pub offset: usize,
    /// Maximum number of hits; `None` means the configured cap.
    pub limit: Option<usize>,
    /// Requested facets.
    pub facets: Vec<FacetBuilder>,
}

impl Query {
    /// Creates an empty query matching everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the filter criterion.
    #[must_use]
    pub fn with_filter(mut self, filter: Criterion) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sets the scoring criterion.
    #[must_use]
    pub fn with_query(mut self, query: Criterion) -> Self {
        self.query = Some(query);
        self
    }

    /// Appends a sort clause.
    #[must_use]
    pub fn with_sort(mut self, clause: SortClause) -> Self {
        self.sort_clauses.push(clause);
        self
    }

    /// Sets the offset.
    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the limit.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Appends a facet request.
    #[must_use]
    pub fn with_facet(mut self, facet: FacetBuilder) -> Self {
        self.facets.push(facet);
        self
    }
}

/// Request-scoped language filter.
///
/// `languages` is ordered by priority. An empty list disables language filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFilters {
    /// Requested languages, highest priority first.
    #[serde(default)]
    pub languages: Vec<String>,
    /// Also accept always-available contents through their main language.
    #[serde(default, rename = "useAlwaysAvailable", alias = "use_always_available")]
    pub use_always_available: bool,
}

impl FieldFilters {
    /// Filters for the given languages, without always-available fallback.
    #[must_use]
    pub fn languages<I, S>(languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            languages: languages.into_iter().map(Into::into).collect(),
            use_always_available: false,
        }
    }

    /// Enables or disables the always-available fallback.
    #[must_use]
    pub fn with_always_available(mut self, use_always_available: bool) -> Self {
        self.use_always_available = use_always_available;
        self
    }

    /// Returns true when no language restriction applies.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.languages.is_empty()
    }

    /// Priority of a language: its index in `languages`.
    #[must_use]
    pub fn priority(&self, language: &str) -> Option<usize> {
        self.languages.iter().position(|l| l == language)
    }
}
