//! Tests for `config` module

use super::config::*;
use super::field_registry::FieldKind;
use super::handler::CommitMode;
use std::io::Write;

// ========================================================================
// Defaults
// ========================================================================

#[test]
fn test_config_default_values() {
    // Arrange & Act
    let config = ContentSearchConfig::default();

    // Assert
    assert_eq!(config.search.max_limit, 1000);
    assert_eq!(config.search.request_timeout_ms, 5000);
    assert_eq!(config.indexing.commit_mode, CommitMode::Eventual);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, "text");
    assert!(config.fields.is_empty());
    assert!(config.validate().is_ok());
}

// ========================================================================
// TOML parsing
// ========================================================================

#[test]
fn test_from_toml_overrides_and_keeps_defaults() {
    // Arrange
    let toml_str = r#"
        [search]
        max_limit = 50

        [indexing]
        commit_mode = "sync"

        [[fields]]
        content_type = "folder"
        identifier = "name"
        kind = "string"

        [[fields]]
        content_type = "place"
        identifier = "location"
        kind = "geo_location"
        translatable = false
    "#;

    // Act
    let config = ContentSearchConfig::from_toml(toml_str).expect("parse");

    // Assert
    assert_eq!(config.search.max_limit, 50);
    assert_eq!(config.search.request_timeout_ms, 5000);
    assert_eq!(config.indexing.commit_mode, CommitMode::Sync);
    assert_eq!(config.fields.len(), 2);
    assert!(config.fields[0].translatable);
    assert!(config.fields[0].searchable);
    assert_eq!(config.fields[1].kind, FieldKind::GeoLocation);
    assert!(!config.fields[1].translatable);
}

#[test]
fn test_from_toml_rejects_unknown_commit_mode() {
    // Arrange
    let toml_str = "[indexing]\ncommit_mode = \"later\"\n";

    // Act
    let result = ContentSearchConfig::from_toml(toml_str);

    // Assert
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn test_to_toml_round_trip() {
    // Arrange
    let original = ContentSearchConfig::from_toml(
        r#"
        [search]
        max_limit = 10

        [[fields]]
        content_type = "folder"
        identifier = "name"
        kind = "text"
        "#,
    )
    .expect("parse");

    // Act
    let toml_str = original.to_toml().expect("serialize");
    let reparsed = ContentSearchConfig::from_toml(&toml_str).expect("reparse");

    // Assert
    assert_eq!(reparsed, original);
}

// ========================================================================
// Validation
// ========================================================================

#[test]
fn test_validate_rejects_zero_max_limit() {
    // Arrange
    let mut config = ContentSearchConfig::default();
    config.search.max_limit = 0;

    // Act
    let err = config.validate().unwrap_err();

    // Assert
    assert!(
        matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "search.max_limit")
    );
}

#[test]
fn test_validate_rejects_zero_timeout() {
    let mut config = ContentSearchConfig::default();
    config.search.request_timeout_ms = 0;

    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_unknown_log_level_and_format() {
    // Arrange
    let mut level = ContentSearchConfig::default();
    level.logging.level = "verbose".to_string();
    let mut format = ContentSearchConfig::default();
    format.logging.format = "xml".to_string();

    // Act & Assert
    assert!(level.validate().is_err());
    assert!(format.validate().is_err());
}

#[test]
fn test_validate_rejects_duplicate_fields() {
    // Arrange
    let config = ContentSearchConfig::from_toml(
        r#"
        [[fields]]
        content_type = "folder"
        identifier = "name"
        kind = "string"

        [[fields]]
        content_type = "folder"
        identifier = "name"
        kind = "text"
        "#,
    )
    .expect("parse");

    // Act
    let err = config.validate().unwrap_err();

    // Assert
    assert!(err.to_string().contains("folder/name"));
    assert!(config.field_registry().is_err());
}

#[test]
fn test_field_registry_from_config() {
    // Arrange
    let config = ContentSearchConfig::from_toml(
        "[[fields]]\ncontent_type = \"folder\"\nidentifier = \"name\"\nkind = \"string\"\n",
    )
    .expect("parse");

    // Act
    let registry = config.field_registry().expect("registry");

    // Assert
    assert_eq!(registry.len(), 1);
    assert!(registry.definition("folder", "name").is_some());
}

// ========================================================================
// Files
// ========================================================================

#[test]
fn test_load_from_path_reads_file() {
    // Arrange
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[logging]\nlevel = \"debug\"\nformat = \"json\"").expect("write");

    // Act
    let config = ContentSearchConfig::load_from_path(file.path()).expect("load");

    // Assert
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
    assert_eq!(config.search.max_limit, 1000);
}

#[test]
fn test_load_from_missing_path_fails() {
    // Arrange
    let dir = tempfile::tempdir().expect("temp dir");
    let absent = dir.path().join("absent.toml");

    // Act
    let result = ContentSearchConfig::load_from_path(&absent);

    // Assert
    match result {
        Err(ConfigError::FileNotFound(path)) => assert!(path.ends_with("absent.toml")),
        other => panic!("expected FileNotFound, got {other:?}"),
    }
}

#[test]
fn test_load_from_path_reports_malformed_file() {
    // Arrange
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[search\nmax_limit = ").expect("write");

    // Act
    let result = ContentSearchConfig::load_from_path(file.path());

    // Assert
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn test_config_error_converts_to_crate_error() {
    // Arrange
    let dir = tempfile::tempdir().expect("temp dir");
    let err = ContentSearchConfig::load_from_path(dir.path().join("absent.toml"))
        .expect_err("missing file");

    // Act
    let converted: crate::Error = err.into();

    // Assert
    assert_eq!(converted.code(), "CSE-007");
}
