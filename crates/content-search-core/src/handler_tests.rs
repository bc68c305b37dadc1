//! Tests for `handler` and `async_ops` modules

use super::async_ops;
use super::backend::InMemoryIndex;
use super::config::ContentSearchConfig;
use super::content::*;
use super::criterion::Criterion;
use super::error::Error;
use super::field_registry::{FieldDefinition, FieldKind};
use super::handler::*;
use super::query::{FieldFilters, Query};
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;

fn config() -> ContentSearchConfig {
    ContentSearchConfig {
        fields: vec![FieldDefinition::new("folder", "name", FieldKind::String)],
        ..ContentSearchConfig::default()
    }
}

fn folder(id: i64, name: &str) -> Content {
    let date = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
    Content {
        info: ContentInfo {
            id,
            content_type_id: 1,
            content_type_identifier: "folder".to_string(),
            name: name.to_string(),
            section_id: 1,
            remote_id: format!("remote-{id}"),
            main_language_code: "eng-GB".to_string(),
            always_available: false,
            modification_date: date,
            publication_date: date,
        },
        version: VersionInfo {
            version_no: 1,
            status: VersionStatus::Published,
            creator_id: 14,
            language_codes: vec!["eng-GB".to_string()],
        },
        locations: Vec::new(),
        fields: vec![Field::new("name", "eng-GB", FieldValue::Text(name.to_string()))],
    }
}

fn handler() -> (Arc<InMemoryIndex>, SearchHandler) {
    let index = Arc::new(InMemoryIndex::new());
    let handler = SearchHandler::from_config(index.clone(), &config()).unwrap();
    (index, handler)
}

#[test]
fn test_from_config_rejects_invalid_config() {
    // Arrange
    let mut config = config();
    config.search.max_limit = 0;

    // Act
    let result = SearchHandler::from_config(Arc::new(InMemoryIndex::new()), &config);

    // Assert
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_eventual_commit_waits_for_refresh() {
    // Arrange
    let (_index, handler) = handler();
    handler
        .index_content(&folder(1, "one"), CommitMode::Eventual)
        .unwrap();

    // Act
    let before = handler
        .find_content(&Query::new(), &FieldFilters::default())
        .unwrap();
    handler.refresh().unwrap();
    let after = handler
        .find_content(&Query::new(), &FieldFilters::default())
        .unwrap();

    // Assert
    assert_eq!(handler.default_commit_mode(), CommitMode::Eventual);
    assert_eq!(before.total_count, 0);
    assert_eq!(after.total_count, 1);
}

#[test]
fn test_find_single_requires_exactly_one_match() {
    // Arrange
    let (_index, handler) = handler();
    handler
        .bulk_index_content(&[folder(1, "one"), folder(2, "two")], CommitMode::Sync)
        .unwrap();

    // Act
    let many = handler.find_single(&Criterion::MatchAll, &FieldFilters::default());
    let none = handler.find_single(&Criterion::content_id(9).unwrap(), &FieldFilters::default());
    let one = handler
        .find_single(&Criterion::content_id(2).unwrap(), &FieldFilters::default())
        .unwrap();

    // Assert
    assert!(matches!(
        many,
        Err(Error::InvalidObjectCount {
            expected: 1,
            found: 2
        })
    ));
    assert!(matches!(
        none,
        Err(Error::InvalidObjectCount {
            expected: 1,
            found: 0
        })
    ));
    assert_eq!(one.info.name, "two");
}

#[test]
fn test_delete_and_purge() {
    // Arrange
    let (index, handler) = handler();
    handler
        .bulk_index_content(&[folder(1, "one"), folder(2, "two")], CommitMode::Sync)
        .unwrap();

    // Act
    handler.delete_content(1).unwrap();
    let after_delete = index.len();
    handler.purge_index().unwrap();

    // Assert
    assert_eq!(after_delete, 1);
    assert!(index.is_empty());
}

#[test]
fn test_suggest_defaults_to_content_name() {
    // Arrange
    let (_index, handler) = handler();
    handler
        .bulk_index_content(
            &[folder(1, "Reports"), folder(2, "Recipes"), folder(3, "Images")],
            CommitMode::Sync,
        )
        .unwrap();
    let only_first = Criterion::content_id(1).unwrap();

    // Act
    let all = handler.suggest("re", &[], 10, None).unwrap();
    let filtered = handler.suggest("re", &[], 10, Some(&only_first)).unwrap();

    // Assert
    assert_eq!(all, ["Recipes", "Reports"]);
    assert_eq!(filtered, ["Reports"]);
}

#[test]
fn test_backend_failure_is_retryable() {
    // Arrange
    let (index, handler) = handler();
    index.set_offline(true);

    // Act
    let err = handler
        .find_content(&Query::new(), &FieldFilters::default())
        .unwrap_err();

    // Assert
    assert_eq!(err.code(), "CSE-004");
    assert!(err.is_retryable());
}

// -------------------------------------------------------------------------
// async_ops
// -------------------------------------------------------------------------

#[tokio::test]
async fn test_async_index_then_find() {
    // Arrange
    let (_index, handler) = handler();
    let handler = Arc::new(handler);
    let timeout = Duration::from_secs(5);

    // Act
    async_ops::index_content_async(
        Arc::clone(&handler),
        vec![folder(1, "one")],
        CommitMode::Sync,
        timeout,
    )
    .await
    .unwrap();
    let result = async_ops::find_content_async(
        Arc::clone(&handler),
        Query::new(),
        FieldFilters::languages(["eng-GB"]),
        timeout,
    )
    .await
    .unwrap();
    let single = async_ops::find_single_async(
        handler,
        Criterion::content_id(1).unwrap(),
        FieldFilters::default(),
        timeout,
    )
    .await
    .unwrap();

    // Assert
    assert_eq!(result.content_ids(), [1]);
    assert_eq!(single.id(), 1);
}

#[tokio::test]
async fn test_run_blocking_times_out() {
    // Act
    let result = async_ops::run_blocking(Duration::from_millis(10), || {
        std::thread::sleep(Duration::from_millis(200));
        Ok(())
    })
    .await;

    // Assert
    assert!(matches!(result, Err(Error::BackendUnavailable(_))));
}

#[tokio::test]
async fn test_run_blocking_reports_panics_as_internal() {
    // Act
    let result: super::error::Result<()> =
        async_ops::run_blocking(Duration::from_secs(1), || panic!("boom")).await;

    // Assert
    assert!(matches!(result, Err(Error::Internal(_))));
}
