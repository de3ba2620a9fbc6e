//! Update Semantics Tests
//!
//! `update` replaces a node in place: its position among siblings stays put,
//! and a missing path behaves like `add`.

use crate::test_utils::*;

#[test]
fn test_update_scalar_in_array_keeps_order() {
    let doc = create_test_doc();
    doc.add("/arr", json!([1, 2, 3]), false).unwrap();

    let stored = doc.update("/arr/1", json!("two"), false).unwrap();

    assert_eq!(stored, "/arr/1");
    assert_eq!(doc.keys("/arr").unwrap(), vec!["0", "1", "2"]);
    assert_document(&doc, json!({"arr": [1, "two", 3]}));
}

#[test]
fn test_update_array_element_to_container_keeps_index() {
    let doc = create_test_doc();
    doc.add("/arr", json!([1, 2, 3]), false).unwrap();

    doc.update("/arr/0", json!({"x": [1, 2]}), false).unwrap();

    assert_eq!(doc.get_int("/arr/1").unwrap(), 2);
    assert_document(&doc, json!({"arr": [{"x": [1, 2]}, 2, 3]}));
}

#[test]
fn test_update_object_member_keeps_position() {
    let doc = create_test_doc();
    doc.add("/o", json!({"first": 1, "second": {"deep": true}, "third": 3}), false)
        .unwrap();

    doc.update("/o/second", json!(null), false).unwrap();
    doc.update("/o/first", json!([9]), false).unwrap();

    assert_eq!(doc.keys("/o").unwrap(), vec!["first", "second", "third"]);
    assert_document(&doc, json!({"o": {"first": [9], "second": null, "third": 3}}));
}

#[test]
fn test_update_missing_path_inserts() {
    let doc = create_test_doc();
    doc.add("/list", json!([]), false).unwrap();

    assert_eq!(doc.update("/new", json!(1), false).unwrap(), "/new");
    assert_eq!(doc.update("/list/#", json!("a"), false).unwrap(), "/list/0");
    assert_document(&doc, json!({"list": ["a"], "new": 1}));
}

#[test]
fn test_update_missing_parent() {
    let doc = create_test_doc();
    let err = doc.update("/a/b", json!(1), false).unwrap_err();
    assert!(matches!(err, ArborError::ParentMissing { .. }));

    doc.update("/a/b", json!(1), true).unwrap();
    assert_document(&doc, json!({"a": {"b": 1}}));
}

#[test]
fn test_update_changes_type() {
    let doc = create_test_doc();
    doc.add("/v", json!("text"), false).unwrap();
    doc.update("/v", json!(2.5), false).unwrap();
    assert_eq!(doc.type_of("/v").unwrap(), NodeType::Double);
    doc.update("/v", json!([]), false).unwrap();
    assert_eq!(doc.type_of("/v").unwrap(), NodeType::Array);
    assert_eq!(doc.add("/v/#", json!(1), false).unwrap(), "/v/0");
    assert_document(&doc, json!({"v": [1]}));
}

#[test]
fn test_update_container_to_scalar_drops_children() {
    let doc = create_test_doc();
    doc.add("/o", json!({"a": {"b": [1, 2]}}), false).unwrap();
    doc.add("/after", json!(true), false).unwrap();

    doc.update("/o", json!(0), false).unwrap();

    assert!(!doc.has("/o/a").unwrap());
    assert_eq!(doc.node_count().unwrap(), 3);
    assert_document(&doc, json!({"o": 0, "after": true}));
}

#[test]
fn test_update_root() {
    let doc = create_test_doc();
    doc.add("/old", json!(1), false).unwrap();

    doc.update("/", json!({"fresh": [1]}), false).unwrap();
    assert_document(&doc, json!({"fresh": [1]}));

    let err = doc.update("/", json!(5), false).unwrap_err();
    assert!(matches!(err, ArborError::InvalidValue { .. }));
    assert_document(&doc, json!({"fresh": [1]}));
}
