//! Tests for `gateway` module

use super::backend::{BackendResponse, InMemoryIndex, IndexBackend};
use super::document::Document;
use super::error::{Error, Result};
use super::field_registry::FieldRegistry;
use super::field_type::FieldTypeRegistry;
use super::gateway::*;
use super::mapper::ContentMapper;
use super::physical::SearchRequest;
use std::sync::Arc;
use std::time::Duration;

/// Backend answering every search with an empty page after a fixed delay.
struct DelayedBackend {
    delay: Duration,
    enforces_deadline: bool,
}

impl IndexBackend for DelayedBackend {
    fn search(&self, _request: &SearchRequest) -> Result<BackendResponse> {
        std::thread::sleep(self.delay);
        Ok(BackendResponse {
            total: 0,
            hits: Vec::new(),
            facets: Vec::new(),
            took: self.delay,
        })
    }

    fn enforces_deadline(&self) -> bool {
        self.enforces_deadline
    }

    fn index(&self, _documents: Vec<Document>) -> Result<()> {
        Ok(())
    }

    fn delete(&self, _id: &str) -> Result<()> {
        Ok(())
    }

    fn purge(&self) -> Result<()> {
        Ok(())
    }

    fn refresh(&self) -> Result<()> {
        Ok(())
    }
}

fn gateway(backend: Arc<dyn IndexBackend>) -> SearchGateway {
    let mapper = ContentMapper::new(
        Arc::new(FieldRegistry::new()),
        Arc::new(FieldTypeRegistry::new()),
    );
    SearchGateway::new(backend, mapper)
}

fn delayed(delay_ms: u64, enforces_deadline: bool) -> SearchGateway {
    gateway(Arc::new(DelayedBackend {
        delay: Duration::from_millis(delay_ms),
        enforces_deadline,
    }))
}

// -------------------------------------------------------------------------
// Backends enforcing the request budget
// -------------------------------------------------------------------------

#[test]
fn test_in_memory_search_within_budget_is_returned() {
    // Arrange
    let index = Arc::new(InMemoryIndex::new());
    index.set_latency(Duration::from_millis(20));
    let gateway = gateway(index);

    // Act
    let result = gateway.execute(&SearchRequest::match_all(10, 1_000));

    // Assert
    let result = result.unwrap();
    assert_eq!(result.total_count, 0);
    assert!(result.hits.is_empty());
}

#[test]
fn test_in_memory_deadline_error_is_propagated() {
    // Arrange
    let index = Arc::new(InMemoryIndex::new());
    index.set_latency(Duration::from_millis(30));
    let gateway = gateway(index);

    // Act
    let result = gateway.execute(&SearchRequest::match_all(10, 5));

    // Assert
    assert!(matches!(result, Err(Error::BackendUnavailable(_))));
}

#[test]
fn test_completed_response_from_deadline_aware_backend_is_kept() {
    // Arrange
    let gateway = delayed(30, true);

    // Act
    let result = gateway.execute(&SearchRequest::match_all(10, 5));

    // Assert
    assert!(result.is_ok());
}

// -------------------------------------------------------------------------
// Backends ignoring the request budget
// -------------------------------------------------------------------------

#[test]
fn test_late_response_is_rejected() {
    // Arrange
    let gateway = delayed(30, false);

    // Act
    let result = gateway.execute(&SearchRequest::match_all(10, 5));

    // Assert
    match result {
        Err(err @ Error::BackendUnavailable(_)) => assert!(err.is_retryable()),
        other => panic!("expected BackendUnavailable, got {other:?}"),
    }
}

#[test]
fn test_timely_response_is_returned() {
    // Arrange
    let gateway = delayed(0, false);

    // Act
    let result = gateway.execute(&SearchRequest::match_all(10, 1_000));

    // Assert
    assert_eq!(result.unwrap().total_count, 0);
}
