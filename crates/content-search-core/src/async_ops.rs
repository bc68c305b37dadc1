//! Async wrappers for blocking handler operations.
//!
//! Handler calls are synchronous and may wait on the backend. These wrappers run them
//! on Tokio's blocking thread pool under the configured request timeout, so async
//! services can call them without stalling the executor.
//!
//! # Usage
//!
//! ```rust,ignore
//! use content_search_core::async_ops;
//! use std::sync::Arc;
//!
//! async fn search(handler: Arc<SearchHandler>, query: Query) -> Result<SearchResult> {
//!     async_ops::find_content_async(handler, query, FieldFilters::default(), timeout).await
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::content::Content;
use crate::criterion::Criterion;
use crate::error::{Error, Result};
use crate::handler::{CommitMode, SearchHandler};
use crate::query::{FieldFilters, Query};
use crate::search_result::SearchResult;

/// Runs a blocking closure on the blocking pool, failing with
/// [`Error::BackendUnavailable`] once `timeout` elapses.
///
/// The closure keeps running to completion after a timeout; only its result is
/// discarded.
///
/// # Errors
///
/// Returns the closure's error, [`Error::BackendUnavailable`] on timeout, or
/// [`Error::Internal`] if the task panics.
pub async fn run_blocking<T, F>(timeout: Duration, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let task = tokio::task::spawn_blocking(f);
    match tokio::time::timeout(timeout, task).await {
        Ok(joined) => joined.map_err(|e| Error::Internal(format!("Task join error: {e}")))?,
        Err(_) => {
            tracing::warn!(timeout_ms = timeout.as_millis() as u64, "Blocking call timed out");
            Err(Error::BackendUnavailable(format!(
                "operation timed out after {} ms",
                timeout.as_millis()
            )))
        }
    }
}

/// Asynchronously runs [`SearchHandler::find_content`].
///
/// # Errors
///
/// See [`SearchHandler::find_content`] and [`run_blocking`].
pub async fn find_content_async(
    handler: Arc<SearchHandler>,
    query: Query,
    filters: FieldFilters,
    timeout: Duration,
) -> Result<SearchResult> {
    run_blocking(timeout, move || handler.find_content(&query, &filters)).await
}

/// Asynchronously runs [`SearchHandler::find_single`].
///
/// # Errors
///
/// See [`SearchHandler::find_single`] and [`run_blocking`].
pub async fn find_single_async(
    handler: Arc<SearchHandler>,
    criterion: Criterion,
    filters: FieldFilters,
    timeout: Duration,
) -> Result<Content> {
    run_blocking(timeout, move || handler.find_single(&criterion, &filters)).await
}

/// Asynchronously indexes contents in one batch.
///
/// # Errors
///
/// See [`SearchHandler::bulk_index_content`] and [`run_blocking`].
pub async fn index_content_async(
    handler: Arc<SearchHandler>,
    contents: Vec<Content>,
    mode: CommitMode,
    timeout: Duration,
) -> Result<()> {
    run_blocking(timeout, move || handler.bulk_index_content(&contents, mode)).await
}
