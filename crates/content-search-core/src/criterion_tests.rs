//! Tests for `criterion` module

use super::criterion::*;
use super::error::Error;
use super::operator::Operator;
use super::value::{CriterionValue, Scalar};

// -------------------------------------------------------------------------
// Specification enforcement per leaf
// -------------------------------------------------------------------------

#[test]
fn test_content_id_rejects_unsupported_operator() {
    let result = ContentIdCriterion::new(Operator::Gt, 4);

    assert!(matches!(result, Err(Error::InvalidOperator { .. })));
}

#[test]
fn test_content_id_accepts_string_and_integer_ids() {
    assert!(Criterion::content_ids(vec![Scalar::from(4), Scalar::from("58")]).is_ok());
    assert!(Criterion::content_id("4").is_ok());
}

#[test]
fn test_content_id_in_requires_array() {
    let result = ContentIdCriterion::new(Operator::In, 4);

    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

#[test]
fn test_content_id_rejects_boolean() {
    let result = Criterion::content_id(true);

    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

#[test]
fn test_full_text_only_supports_like() {
    let result = FullTextCriterion::with_operator(Operator::Eq, "one");

    let err = result.unwrap_err();
    assert_eq!(
        err.to_string(),
        "[CSE-002] Operator EQ is not supported by FullText"
    );
}

#[test]
fn test_full_text_rejects_blank_text() {
    assert!(Criterion::full_text("   ").is_err());
    assert!(Criterion::full_text("one").is_ok());
}

#[test]
fn test_date_between_requires_two_integers() {
    // Arrange
    let one = vec![1_700_000_000_i64];
    let three = vec![1_i64, 2, 3];
    let two = vec![1_i64, 2];

    // Act & Assert
    assert!(Criterion::metadata(MetadataTarget::DateModified, Operator::Between, one).is_err());
    assert!(Criterion::metadata(MetadataTarget::DateModified, Operator::Between, three).is_err());
    assert!(Criterion::metadata(MetadataTarget::DateModified, Operator::Between, two).is_ok());
}

#[test]
fn test_date_rejects_like() {
    let result = MetadataCriterion::new(MetadataTarget::DatePublished, Operator::Like, 5);

    assert!(matches!(
        result,
        Err(Error::InvalidOperator { ref criterion, .. }) if criterion == "DatePublished"
    ));
}

#[test]
fn test_remote_id_rejects_integer() {
    let result = Criterion::metadata(MetadataTarget::RemoteId, Operator::Eq, 12);

    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

#[test]
fn test_subtree_requires_path_string() {
    assert!(Criterion::subtree(vec!["/1/2/"]).is_ok());
    assert!(Criterion::subtree(vec!["1/2"]).is_err());
}

#[test]
fn test_field_between_requires_two_values() {
    assert!(Criterion::field("price", Operator::Between, vec![1, 2, 3]).is_err());
    assert!(Criterion::field("price", Operator::Between, vec![1.5, 9.0]).is_ok());
}

#[test]
fn test_field_rejects_empty_identifier() {
    assert!(FieldCriterion::new("", Operator::Eq, 1).is_err());
}

#[test]
fn test_field_accepts_every_scalar_type() {
    for value in [
        CriterionValue::from(1),
        CriterionValue::from(1.5),
        CriterionValue::from(true),
        CriterionValue::from("x"),
    ] {
        assert!(FieldCriterion::new("f", Operator::Eq, value).is_ok());
    }
}

#[test]
fn test_distance_rejects_string_and_negative_values() {
    assert!(Criterion::map_location_distance("location", Operator::Lte, "5", 45.0, 15.0).is_err());
    assert!(Criterion::map_location_distance("location", Operator::Lte, -1.0, 45.0, 15.0).is_err());
    assert!(Criterion::map_location_distance("location", Operator::Lte, 5, 45.0, 15.0).is_ok());
}

#[test]
fn test_distance_rejects_eq_and_invalid_origin() {
    let eq = Criterion::map_location_distance("location", Operator::Eq, 5, 45.0, 15.0);
    let origin = Criterion::map_location_distance("location", Operator::Lt, 5, 95.0, 15.0);

    assert!(matches!(eq, Err(Error::InvalidOperator { .. })));
    assert!(matches!(origin, Err(Error::InvalidArgument(_))));
}

// -------------------------------------------------------------------------
// Operator introspection
// -------------------------------------------------------------------------

#[test]
fn test_supported_operators_per_leaf() {
    let full_text = Criterion::full_text("one").unwrap();
    let content_id = Criterion::content_id(1).unwrap();
    let composite = Criterion::and(vec![]);

    assert_eq!(full_text.supported_operators(), vec![Operator::Like]);
    assert_eq!(
        content_id.supported_operators(),
        vec![Operator::In, Operator::Eq]
    );
    assert!(composite.supported_operators().is_empty());
    assert!(!composite.is_leaf());
}

#[test]
fn test_field_specifications_cover_every_operator() {
    let ops: Vec<Operator> = FieldCriterion::SPECIFICATIONS
        .supported_operators()
        .collect();

    for op in [
        Operator::Eq,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::In,
        Operator::Between,
        Operator::Like,
        Operator::Contains,
    ] {
        assert!(ops.contains(&op), "missing {op}");
    }
}

// -------------------------------------------------------------------------
// Custom field overrides
// -------------------------------------------------------------------------

#[test]
fn test_custom_field_override_is_exact_pair() {
    // Arrange
    let criterion = FieldCriterion::new("name", Operator::Eq, "x")
        .unwrap()
        .with_custom_field("folder", "name", "folder_name_value_s");

    // Act
    let overrides = criterion.custom_fields();

    // Assert
    assert_eq!(overrides.get("folder", "name"), Some("folder_name_value_s"));
    assert_eq!(overrides.get("article", "name"), None);
    assert_eq!(overrides.get("folder", "title"), None);
    assert_eq!(overrides.content_types_for("name").collect::<Vec<_>>(), vec!["folder"]);
}

#[test]
fn test_criterion_tree_shape() {
    let tree = Criterion::and(vec![
        Criterion::content_type_identifier(vec!["folder"]).unwrap(),
        Criterion::not(Criterion::or(vec![
            Criterion::content_id(1).unwrap(),
            Criterion::content_id(2).unwrap(),
        ])),
    ]);

    assert_eq!(tree.node_count(), 6);
}

#[test]
fn test_criterion_serializes_with_type_tag() {
    let criterion = Criterion::full_text("one").unwrap();

    let json = serde_json::to_value(&criterion).unwrap();

    assert_eq!(json["type"], "full_text");
    assert_eq!(json["text"], "one");
}
