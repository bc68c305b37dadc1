//! Index backend seam.
//!
//! The search index is an external collaborator. [`IndexBackend`] is the narrow
//! interface the crate needs from it; [`memory::InMemoryIndex`] is the in-process
//! implementation used by tests and embedded deployments.

pub mod memory;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::physical::{Facet, PhysicalQuery, SearchRequest};

pub use memory::InMemoryIndex;

/// One scored document returned by a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendHit {
    /// Relevance score.
    pub score: f32,
    /// Stored document.
    pub document: Document,
}

/// Raw backend answer to a [`SearchRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendResponse {
    /// Number of matching documents, independent of pagination.
    pub total: usize,
    /// The requested page of hits, in order.
    pub hits: Vec<BackendHit>,
    /// Facet counts over every match.
    pub facets: Vec<Facet>,
    /// Time spent by the backend.
    pub took: Duration,
}

/// A search index able to store documents and evaluate physical requests.
pub trait IndexBackend: Send + Sync {
    /// Executes a request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BackendUnavailable`] when the index cannot be reached or the request
    /// exceeds its time budget.
    fn search(&self, request: &SearchRequest) -> Result<BackendResponse>;

    /// Whether [`IndexBackend::search`] enforces [`SearchRequest::timeout_ms`] itself.
    ///
    /// When false, the gateway times the call and rejects a response that arrives after
    /// the budget. Backends that abort on their own deadline return true so that a
    /// response they completed is never discarded.
    fn enforces_deadline(&self) -> bool {
        false
    }

    /// Stores documents, replacing any with the same id. Writes become searchable after
    /// the next [`IndexBackend::refresh`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::BackendUnavailable`] when the index cannot be reached.
    fn index(&self, documents: Vec<Document>) -> Result<()>;

    /// Deletes a document. Deletions are visible immediately.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BackendUnavailable`] when the index cannot be reached.
    fn delete(&self, id: &str) -> Result<()>;

    /// Deletes every document, pending writes included.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BackendUnavailable`] when the index cannot be reached.
    fn purge(&self) -> Result<()>;

    /// Makes every pending write searchable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BackendUnavailable`] when the index cannot be reached.
    fn refresh(&self) -> Result<()>;

    /// Completion suggestions: stored values of `fields` starting with `prefix`, restricted
    /// to documents matching `filter`.
    ///
    /// # Errors
    ///
    /// The default implementation returns [`Error::NotImplemented`].
    fn suggest(
        &self,
        prefix: &str,
        fields: &[String],
        limit: usize,
        filter: &PhysicalQuery,
    ) -> Result<Vec<String>> {
        let _ = (prefix, fields, limit, filter);
        Err(Error::NotImplemented("suggest".into()))
    }
}
