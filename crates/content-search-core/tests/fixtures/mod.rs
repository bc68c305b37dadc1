//! Shared fixtures for the content search integration tests.
//!
//! Contents are folders with a translatable `name`, an unused translatable `short_name`
//! (used as a custom-field alias target), a language-neutral `map_location` and a
//! translatable `location`.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use content_search_core::{
    CommitMode, Content, ContentInfo, ContentSearchConfig, Field, FieldDefinition, FieldKind,
    FieldValue, InMemoryIndex, Location, SearchHandler, VersionInfo, VersionStatus,
};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

static NEXT_ID: AtomicI64 = AtomicI64::new(100);

/// Handler over a fresh in-memory index, indexing synchronously by default.
pub struct Harness {
    pub index: Arc<InMemoryIndex>,
    pub handler: SearchHandler,
}

impl Harness {
    pub fn new() -> Self {
        let index = Arc::new(InMemoryIndex::new());
        let handler =
            SearchHandler::from_config(index.clone(), &config()).expect("valid test config");
        Self { index, handler }
    }

    /// Indexes the contents and makes them searchable.
    pub fn with(contents: &[Content]) -> Self {
        let harness = Self::new();
        harness
            .handler
            .bulk_index_content(contents, CommitMode::Sync)
            .expect("index fixtures");
        harness
    }
}

pub fn config() -> ContentSearchConfig {
    ContentSearchConfig {
        fields: vec![
            FieldDefinition::new("folder", "name", FieldKind::String),
            FieldDefinition::new("folder", "short_name", FieldKind::String),
            FieldDefinition::new("folder", "map_location", FieldKind::GeoLocation)
                .translatable(false),
            FieldDefinition::new("folder", "location", FieldKind::GeoLocation),
        ],
        ..ContentSearchConfig::default()
    }
}

/// A folder with a name in two languages.
pub fn folder_with_name(
    first_language: &str,
    first_name: &str,
    second_language: &str,
    second_name: &str,
    main_language: &str,
    always_available: bool,
) -> Content {
    let mut content = blank_folder(main_language, always_available);
    content.info.name = if main_language == first_language {
        first_name.to_string()
    } else {
        second_name.to_string()
    };
    for (language, name) in [(first_language, first_name), (second_language, second_name)] {
        content.version.language_codes.push(language.to_string());
        content
            .fields
            .push(Field::new("name", language, FieldValue::Text(name.to_string())));
    }
    content
}

/// A folder with a translatable `location` in two languages, as `(latitude, longitude)`.
pub fn folder_with_location(
    first_language: &str,
    first_point: (f64, f64),
    second_language: &str,
    second_point: (f64, f64),
    main_language: &str,
    always_available: bool,
) -> Content {
    let mut content = blank_folder(main_language, always_available);
    content.info.name = format!("located {}", content.info.id);
    for (language, (latitude, longitude)) in
        [(first_language, first_point), (second_language, second_point)]
    {
        content.version.language_codes.push(language.to_string());
        content.fields.push(Field::new(
            "location",
            language,
            FieldValue::MapLocation {
                latitude,
                longitude,
                address: None,
            },
        ));
    }
    content
}

/// A folder translated into a single language.
pub fn folder_in(language: &str, name: &str, always_available: bool) -> Content {
    let mut content = blank_folder(language, always_available);
    content.info.name = name.to_string();
    content.version.language_codes.push(language.to_string());
    content
        .fields
        .push(Field::new("name", language, FieldValue::Text(name.to_string())));
    content
}

/// An eng-GB folder placed at the given coordinates.
pub fn place(name: &str, latitude: f64, longitude: f64) -> Content {
    let mut content = folder_in("eng-GB", name, false);
    content.fields.push(Field::new(
        "map_location",
        "eng-GB",
        FieldValue::MapLocation {
            latitude,
            longitude,
            address: Some(format!("{name} city centre")),
        },
    ));
    content
}

fn blank_folder(main_language: &str, always_available: bool) -> Content {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let date = Utc
        .with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
        .single()
        .expect("valid date");
    Content {
        info: ContentInfo {
            id,
            content_type_id: 1,
            content_type_identifier: "folder".to_string(),
            name: String::new(),
            section_id: 1,
            remote_id: format!("folder-{id}"),
            main_language_code: main_language.to_string(),
            always_available,
            modification_date: date,
            publication_date: date,
        },
        version: VersionInfo {
            version_no: 1,
            status: VersionStatus::Published,
            creator_id: 14,
            language_codes: Vec::new(),
        },
        locations: vec![Location {
            id: id + 1000,
            path_string: format!("/1/2/{}/", id + 1000),
            depth: 2,
            parent_id: 2,
            remote_id: format!("location-{id}"),
        }],
        fields: Vec::new(),
    }
}
