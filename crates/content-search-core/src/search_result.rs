//! Search results.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::content::Content;
use crate::physical::Facet;

/// One ranked hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Relevance score.
    pub score: f32,
    /// The matched content, with field translations in language priority order.
    pub value_object: Content,
}

/// Hits, total count and facets of one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Number of visible matches, independent of pagination.
    pub total_count: usize,
    /// The requested page of hits.
    pub hits: Vec<SearchHit>,
    /// Facets, if requested.
    pub facets: Vec<Facet>,
    /// Query duration reported by the backend.
    pub time: Duration,
}

impl SearchResult {
    /// Ids of the hits, in order.
    #[must_use]
    pub fn content_ids(&self) -> Vec<i64> {
        self.hits.iter().map(|h| h.value_object.id()).collect()
    }

    /// Facet by name.
    #[must_use]
    pub fn facet(&self, name: &str) -> Option<&Facet> {
        self.facets.iter().find(|f| f.name == name)
    }

    /// Returns true if there are no hits on this page.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}
