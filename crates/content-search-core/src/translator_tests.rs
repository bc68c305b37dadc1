//! Tests for `translator` module

use super::criterion::{Criterion, FieldCriterion, MetadataTarget};
use super::document::{names, IndexValue};
use super::error::Error;
use super::field_registry::{FieldDefinition, FieldKind, FieldRegistry};
use super::operator::Operator;
use super::physical::{PhysicalQuery, PhysicalSort};
use super::query::{FacetBuilder, FieldFilters, Query};
use super::sort_clause::{SortClause, SortDirection, SortTarget};
use super::translator::*;
use super::value::Scalar;
use std::sync::Arc;

fn translator() -> QueryTranslator {
    let fields = FieldRegistry::from_definitions([
        FieldDefinition::new("folder", "name", FieldKind::String),
        FieldDefinition::new("folder", "short_name", FieldKind::String),
        FieldDefinition::new("article", "name", FieldKind::Text),
        FieldDefinition::new("folder", "priority", FieldKind::Integer).translatable(false),
        FieldDefinition::new("place", "location", FieldKind::GeoLocation),
    ])
    .unwrap();
    QueryTranslator::new(Arc::new(fields), 100, 2000)
}

fn term(field: &str, value: impl Into<IndexValue>) -> PhysicalQuery {
    PhysicalQuery::term(field, value)
}

// -------------------------------------------------------------------------
// Language expansion
// -------------------------------------------------------------------------

#[test]
fn test_field_expands_one_branch_per_language() {
    // Arrange
    let translator = translator();
    let criterion = Criterion::field("short_name", Operator::Eq, "one").unwrap();
    let filters = FieldFilters::languages(["eng-GB", "eng-US"]);

    // Act
    let query = translator.translate_criterion(&criterion, &filters).unwrap();

    // Assert
    assert_eq!(
        query,
        PhysicalQuery::or(vec![
            term("folder_short_name_value_s_eng-GB", "one"),
            term("folder_short_name_value_s_eng-US", "one"),
        ])
    );
}

#[test]
fn test_field_uses_all_projection_without_languages() {
    // Arrange
    let translator = translator();
    let criterion = Criterion::field("short_name", Operator::Eq, "one").unwrap();

    // Act
    let query = translator
        .translate_criterion(&criterion, &FieldFilters::default())
        .unwrap();

    // Assert
    assert_eq!(query, term("folder_short_name_value_s_all", "one"));
}

#[test]
fn test_field_adds_always_available_branch() {
    // Arrange
    let translator = translator();
    let criterion = Criterion::field("short_name", Operator::Eq, "one").unwrap();
    let filters = FieldFilters::languages(["ger-DE"]).with_always_available(true);

    // Act
    let query = translator.translate_criterion(&criterion, &filters).unwrap();

    // Assert
    assert_eq!(
        query,
        PhysicalQuery::or(vec![
            term("folder_short_name_value_s_ger-DE", "one"),
            PhysicalQuery::and(vec![
                term(names::ALWAYS_AVAILABLE, true),
                term("folder_short_name_value_s_main", "one"),
            ]),
        ])
    );
}

#[test]
fn test_non_translatable_field_ignores_languages() {
    // Arrange
    let translator = translator();
    let criterion = Criterion::field("priority", Operator::Gte, 3).unwrap();
    let filters = FieldFilters::languages(["eng-GB", "eng-US"]).with_always_available(true);

    // Act
    let query = translator.translate_criterion(&criterion, &filters).unwrap();

    // Assert
    assert_eq!(
        query,
        PhysicalQuery::Range {
            field: "folder_priority_value_i".to_string(),
            lower: Some(IndexValue::Integer(3)),
            upper: None,
            include_lower: true,
            include_upper: true,
        }
    );
}

#[test]
fn test_field_registered_on_several_content_types_is_ored() {
    // Arrange
    let translator = translator();
    let criterion = Criterion::field("name", Operator::Eq, "one").unwrap();
    let filters = FieldFilters::languages(["eng-GB"]);

    // Act
    let query = translator.translate_criterion(&criterion, &filters).unwrap();

    // Assert
    assert_eq!(
        query.fields(),
        ["article_name_value_t_eng-GB", "folder_name_value_s_eng-GB"]
    );
}

#[test]
fn test_custom_field_override_replaces_base_name() {
    // Arrange
    let translator = translator();
    let criterion = Criterion::Field(
        FieldCriterion::new("name", Operator::Eq, "one")
            .unwrap()
            .with_custom_field("folder", "name", "folder_short_name_value_s"),
    );
    let filters = FieldFilters::languages(["eng-US"]);

    // Act
    let query = translator.translate_criterion(&criterion, &filters).unwrap();

    // Assert
    assert!(query.fields().contains(&"folder_short_name_value_s_eng-US"));
    assert!(!query.fields().contains(&"folder_name_value_s_eng-US"));
}

#[test]
fn test_unknown_field_fails() {
    // Arrange
    let translator = translator();
    let criterion = Criterion::field("missing", Operator::Eq, "x").unwrap();

    // Act
    let result = translator.translate_criterion(&criterion, &FieldFilters::default());

    // Assert
    assert!(matches!(result, Err(Error::UnknownField(ref f)) if f == "missing"));
}

#[test]
fn test_full_text_expands_over_text_fields() {
    // Arrange
    let translator = translator();
    let criterion = Criterion::full_text("one").unwrap();
    let filters = FieldFilters::languages(["eng-GB", "eng-US"]);

    // Act
    let query = translator.translate_criterion(&criterion, &filters).unwrap();

    // Assert
    assert_eq!(query.fields(), ["text_eng-GB", "text_eng-US"]);
}

// -------------------------------------------------------------------------
// Leaf compilation
// -------------------------------------------------------------------------

#[test]
fn test_string_value_coerced_to_integer_field() {
    // Arrange
    let translator = translator();
    let criterion = Criterion::field("priority", Operator::Eq, "7").unwrap();

    // Act
    let query = translator
        .translate_criterion(&criterion, &FieldFilters::default())
        .unwrap();

    // Assert
    assert_eq!(query, term("folder_priority_value_i", 7_i64));
}

#[test]
fn test_uncoercible_value_fails() {
    // Arrange
    let translator = translator();
    let criterion = Criterion::field("priority", Operator::Eq, "high").unwrap();

    // Act
    let result = translator.translate_criterion(&criterion, &FieldFilters::default());

    // Assert
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

#[test]
fn test_like_on_integer_field_fails() {
    let translator = translator();
    let criterion = Criterion::field("priority", Operator::Like, "1*").unwrap();

    let result = translator.translate_criterion(&criterion, &FieldFilters::default());

    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

#[test]
fn test_subtree_becomes_escaped_path_prefix() {
    // Arrange
    let translator = translator();
    let criterion = Criterion::subtree(vec!["/1/2/"]).unwrap();

    // Act
    let query = translator
        .translate_criterion(&criterion, &FieldFilters::default())
        .unwrap();

    // Assert
    assert_eq!(
        query,
        PhysicalQuery::Wildcard {
            field: names::PATH.to_string(),
            pattern: "/1/2/*".to_string(),
        }
    );
}

#[test]
fn test_metadata_date_accepts_timestamp() {
    // Arrange
    let translator = translator();
    let criterion =
        Criterion::metadata(MetadataTarget::DateModified, Operator::Gt, 1_700_000_000_i64)
            .unwrap();

    // Act
    let query = translator
        .translate_criterion(&criterion, &FieldFilters::default())
        .unwrap();

    // Assert
    assert!(matches!(
        query,
        PhysicalQuery::Range {
            lower: Some(IndexValue::Date(1_700_000_000)),
            include_lower: false,
            ..
        }
    ));
}

#[test]
fn test_language_code_matches_always_available() {
    // Arrange
    let translator = translator();
    let criterion = Criterion::language_code(vec!["eng-GB"], true).unwrap();

    // Act
    let query = translator
        .translate_criterion(&criterion, &FieldFilters::default())
        .unwrap();

    // Assert
    assert_eq!(
        query,
        PhysicalQuery::or(vec![
            PhysicalQuery::terms(names::LANGUAGE_CODE, vec![IndexValue::from("eng-GB")]),
            term(names::ALWAYS_AVAILABLE, true),
        ])
    );
}

#[test]
fn test_map_location_distance_lte() {
    // Arrange
    let translator = translator();
    let criterion =
        Criterion::map_location_distance("location", Operator::Lte, 10.0, 45.8, 15.97).unwrap();

    // Act
    let query = translator
        .translate_criterion(&criterion, &FieldFilters::default())
        .unwrap();

    // Assert
    assert_eq!(
        query,
        PhysicalQuery::GeoDistance {
            field: "place_location_value_gl_all".to_string(),
            latitude: 45.8,
            longitude: 15.97,
            min_km: None,
            max_km: Some(10.0),
            include_min: false,
            include_max: true,
        }
    );
}

#[test]
fn test_map_location_distance_on_non_geo_field_fails() {
    let translator = translator();
    let criterion =
        Criterion::map_location_distance("priority", Operator::Lt, 5, 0.0, 0.0).unwrap();

    let result = translator.translate_criterion(&criterion, &FieldFilters::default());

    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

#[test]
fn test_logical_not_of_match_all_is_match_none() {
    let translator = translator();

    let query = translator
        .translate_criterion(&Criterion::not(Criterion::MatchAll), &FieldFilters::default())
        .unwrap();

    assert!(query.is_match_none());
}

// -------------------------------------------------------------------------
// Full requests
// -------------------------------------------------------------------------

#[test]
fn test_translate_clamps_limit_and_defaults_to_cap() {
    // Arrange
    let translator = translator();
    let filters = FieldFilters::default();

    // Act
    let capped = translator
        .translate(&Query::new().with_limit(5000), &filters)
        .unwrap();
    let unset = translator.translate(&Query::new(), &filters).unwrap();
    let small = translator
        .translate(&Query::new().with_limit(3), &filters)
        .unwrap();

    // Assert
    assert_eq!(capped.limit, 100);
    assert_eq!(unset.limit, 100);
    assert_eq!(small.limit, 3);
    assert_eq!(small.timeout_ms, 2000);
}

#[test]
fn test_translate_adds_no_document_language_restriction() {
    // Arrange
    let translator = translator();
    let filters = FieldFilters::languages(["eng-GB"]).with_always_available(true);
    let by_id = Query::new().with_filter(Criterion::content_id(54).unwrap());

    // Act
    let unfiltered = translator.translate(&Query::new(), &filters).unwrap();
    let filtered = translator.translate(&by_id, &filters).unwrap();

    // Assert
    assert_eq!(unfiltered.filter, PhysicalQuery::MatchAll);
    assert_eq!(filtered.filter, term(names::ID, 54_i64));
}

#[test]
fn test_field_sort_uses_given_language_or_main() {
    // Arrange
    let translator = translator();

    // Act
    let given = translator
        .translate_sort(&SortClause::field("folder", "name", Some("eng-US"), SortDirection::Desc))
        .unwrap();
    let main = translator
        .translate_sort(&SortClause::field("folder", "name", None, SortDirection::Asc))
        .unwrap();

    // Assert
    assert_eq!(
        given,
        PhysicalSort::Field {
            field: "folder_name_value_s_eng-US".to_string(),
            direction: SortDirection::Desc,
        }
    );
    assert_eq!(
        main,
        PhysicalSort::Field {
            field: "folder_name_value_s_main".to_string(),
            direction: SortDirection::Asc,
        }
    );
}

#[test]
fn test_map_location_sort_uses_given_language_or_main() {
    // Arrange
    let translator = translator();
    let sort = |language| {
        translator
            .translate_sort(&SortClause::map_location_distance(
                "place",
                "location",
                10.0,
                10.0,
                language,
                SortDirection::Asc,
            ))
            .unwrap()
    };

    // Act
    let british = sort(Some("eng-GB"));
    let main = sort(None);

    // Assert
    assert_eq!(
        british,
        PhysicalSort::GeoDistance {
            field: "place_location_value_gl_eng-GB".to_string(),
            latitude: 10.0,
            longitude: 10.0,
            direction: SortDirection::Asc,
        }
    );
    assert!(
        matches!(main, PhysicalSort::GeoDistance { ref field, .. } if field.ends_with("_main"))
    );
}

#[test]
fn test_sort_on_unknown_field_fails() {
    let translator = translator();

    let result = translator.translate_sort(&SortClause::field(
        "folder",
        "missing",
        None,
        SortDirection::Asc,
    ));

    assert!(matches!(result, Err(Error::UnknownField(_))));
}

#[test]
fn test_system_sorts_and_facets() {
    // Arrange
    let translator = translator();
    let query = Query::new()
        .with_sort(SortClause::desc(SortTarget::DateModified))
        .with_sort(SortClause::asc(SortTarget::ContentId))
        .with_facet(FacetBuilder::ContentType {
            name: "types".to_string(),
            limit: 5,
        });

    // Act
    let request = translator
        .translate(&query, &FieldFilters::default())
        .unwrap();

    // Assert
    assert_eq!(
        request.sort[0],
        PhysicalSort::Field {
            field: names::MODIFIED.to_string(),
            direction: SortDirection::Desc,
        }
    );
    assert_eq!(request.facets[0].field, names::TYPE_IDENTIFIER);
    assert_eq!(request.facets[0].limit, 5);
}

#[test]
fn test_coerce_float_with_fraction_to_integer_fails() {
    assert!(coerce(&Scalar::Float(1.5), Some(FieldKind::Integer)).is_err());
    assert_eq!(
        coerce(&Scalar::Float(2.0), Some(FieldKind::Integer)).unwrap(),
        IndexValue::Integer(2)
    );
}
