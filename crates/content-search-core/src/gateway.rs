//! Search gateway: executes physical requests and rebuilds hits.
//!
//! The gateway never filters by language; that is the post-processor's job.
//!
//! The request's `timeout_ms` travels to the backend. Backends that honour it (see
//! [`IndexBackend::enforces_deadline`]) fail on their own; for the others the gateway
//! measures the call and rejects a late response.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::backend::IndexBackend;
use crate::error::{Error, Result};
use crate::mapper::ContentMapper;
use crate::physical::SearchRequest;
use crate::search_result::{SearchHit, SearchResult};

/// Executes [`SearchRequest`]s against a backend.
#[derive(Clone)]
pub struct SearchGateway {
    backend: Arc<dyn IndexBackend>,
    mapper: ContentMapper,
}

impl std::fmt::Debug for SearchGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchGateway")
            .field("mapper", &self.mapper)
            .finish_non_exhaustive()
    }
}

impl SearchGateway {
    /// Creates a gateway.
    #[must_use]
    pub fn new(backend: Arc<dyn IndexBackend>, mapper: ContentMapper) -> Self {
        Self { backend, mapper }
    }

    /// Runs the request and rebuilds every hit's content.
    ///
    /// The result is unfiltered: `total_count` is the backend's count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BackendUnavailable`] when the backend fails or exceeds the
    /// request's time budget, and [`Error::Serialization`] for unreadable documents.
    pub fn execute(&self, request: &SearchRequest) -> Result<SearchResult> {
        let start = Instant::now();
        let response = self.backend.search(request).map_err(|e| {
            warn!(error = %e, "Search backend call failed");
            e
        })?;

        if !self.backend.enforces_deadline() {
            check_budget(start.elapsed(), request.timeout_ms)?;
        }

        let hits = response
            .hits
            .iter()
            .map(|hit| {
                Ok(SearchHit {
                    score: hit.score,
                    value_object: self.mapper.document_to_content(&hit.document)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            total = response.total,
            hits = hits.len(),
            took_us = response.took.as_micros() as u64,
            "Search executed"
        );

        Ok(SearchResult {
            total_count: response.total,
            hits,
            facets: response.facets,
            time: response.took,
        })
    }
}

/// Rejects a response from a backend that ignored the request budget.
fn check_budget(elapsed: Duration, timeout_ms: u64) -> Result<()> {
    if elapsed <= Duration::from_millis(timeout_ms) {
        return Ok(());
    }
    warn!(
        elapsed_ms = elapsed.as_millis() as u64,
        budget_ms = timeout_ms,
        "Search backend call exceeded its budget"
    );
    Err(Error::BackendUnavailable(format!(
        "search took {} ms, budget is {} ms",
        elapsed.as_millis(),
        timeout_ms
    )))
}
