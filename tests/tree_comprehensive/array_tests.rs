//! Array Tests
//!
//! Appending, explicit indices and renumbering after removal.

use crate::test_utils::*;

#[test]
fn test_append_assigns_sequential_indices() {
    let doc = create_test_doc();
    doc.add("/list", json!([]), false).unwrap();
    for i in 0..5 {
        let stored = doc.add("/list/#", json!(i * 10), false).unwrap();
        assert_eq!(stored, format!("/list/{}", i));
    }
    assert_eq!(doc.keys("/list").unwrap(), vec!["0", "1", "2", "3", "4"]);
    assert_document(&doc, json!({"list": [0, 10, 20, 30, 40]}));
}

#[test]
fn test_append_after_bulk_load() {
    let doc = create_test_doc();
    doc.add("/list", json!(["a", "b"]), false).unwrap();
    assert_eq!(doc.add("/list/#", json!("c"), false).unwrap(), "/list/2");
    assert_value(&doc, "/list", json!(["a", "b", "c"]));
}

#[test]
fn test_append_container_element() {
    let doc = create_test_doc();
    doc.add("/list", json!([1]), false).unwrap();
    doc.add("/list/#", json!({"x": [true, false]}), false).unwrap();
    doc.add("/list/#", json!(3), false).unwrap();
    assert_document(&doc, json!({"list": [1, {"x": [true, false]}, 3]}));
}

#[test]
fn test_explicit_index_rejected() {
    let doc = create_test_doc();
    doc.add("/list", json!([1, 2]), false).unwrap();

    for leaf in ["0", "2", "7", "x"] {
        let err = doc.add(&format!("/list/{}", leaf), json!(9), false).unwrap_err();
        assert!(
            matches!(err, ArborError::InvalidPath { .. }),
            "leaf '{}' gave {:?}",
            leaf,
            err
        );
    }
    assert_value(&doc, "/list", json!([1, 2]));
}

#[test]
fn test_append_to_object_rejected() {
    let doc = create_test_doc();
    doc.add("/obj", json!({}), false).unwrap();
    let err = doc.add("/obj/#", json!(1), false).unwrap_err();
    assert!(matches!(err, ArborError::InvalidPath { .. }));
    let err = doc.add("/#", json!(1), false).unwrap_err();
    assert!(matches!(err, ArborError::InvalidPath { .. }));
    assert_document(&doc, json!({"obj": {}}));
}

/// A literal `#` key inside a value is an ordinary object member.
#[test]
fn test_hash_key_inside_object_value() {
    let doc = create_test_doc();
    doc.add("/obj", json!({"#": 1}), false).unwrap();
    assert_value(&doc, "/obj", json!({"#": 1}));
    assert_eq!(doc.keys("/obj").unwrap(), vec!["#"]);
}

#[test]
fn test_remove_first_middle_last() {
    let doc = create_test_doc();
    doc.add("/list", json!(["a", "b", "c", "d", "e"]), false).unwrap();

    doc.remove("/list/0").unwrap();
    assert_document(&doc, json!({"list": ["b", "c", "d", "e"]}));
    doc.remove("/list/1").unwrap();
    assert_document(&doc, json!({"list": ["b", "d", "e"]}));
    doc.remove("/list/2").unwrap();
    assert_document(&doc, json!({"list": ["b", "d"]}));

    assert_eq!(doc.keys("/list").unwrap(), vec!["0", "1"]);
    assert_eq!(doc.get_string("/list/1").unwrap(), "d");
}

#[test]
fn test_remove_out_of_range() {
    let doc = create_test_doc();
    doc.add("/list", json!([1]), false).unwrap();
    assert!(doc.remove("/list/1").unwrap_err().is_not_found());
    assert_value(&doc, "/list", json!([1]));
}

/// Descendants of shifted elements follow their element's new index.
#[test]
fn test_remove_renames_sibling_descendants() {
    let doc = create_test_doc();
    doc.add(
        "/rows",
        json!([
            {"id": 0},
            {"id": 1, "tags": ["x", "y"]},
            [[2, 3], {"k": "v"}],
            "tail"
        ]),
        false,
    )
    .unwrap();

    doc.remove("/rows/0").unwrap();

    assert_eq!(doc.get_int("/rows/0/id").unwrap(), 1);
    assert_eq!(doc.get_string("/rows/0/tags/1").unwrap(), "y");
    assert_eq!(doc.get_int("/rows/1/0/1").unwrap(), 3);
    assert_eq!(doc.get_string("/rows/1/1/k").unwrap(), "v");
    assert_eq!(doc.get_string("/rows/2").unwrap(), "tail");
    assert!(!doc.has("/rows/3").unwrap());
    assert!(!doc.has("/rows/2/0").unwrap());
    assert_document(
        &doc,
        json!({"rows": [{"id": 1, "tags": ["x", "y"]}, [[2, 3], {"k": "v"}], "tail"]}),
    );
}

/// Elements whose keys contain escaped slashes shift like any other.
#[test]
fn test_remove_with_escaped_keys_below_elements() {
    let doc = create_test_doc();
    doc.add(
        "/list",
        json!([{"a/b": 1}, {"a/b": {"c\\d": 2}}, {"x/": [3]}]),
        false,
    )
    .unwrap();

    doc.remove("/list/0").unwrap();

    assert_eq!(doc.get_int("/list/0/a\\/b/c\\\\d").unwrap(), 2);
    assert_eq!(doc.get_int("/list/1/x\\//0").unwrap(), 3);
    assert_document(&doc, json!({"list": [{"a/b": {"c\\d": 2}}, {"x/": [3]}]}));
}

/// Removing an element of a nested array leaves the outer array alone.
#[test]
fn test_remove_in_nested_array() {
    let doc = create_test_doc();
    doc.add("/m", json!([[1, 2, 3], [4, 5]]), false).unwrap();
    doc.remove("/m/0/1").unwrap();
    assert_document(&doc, json!({"m": [[1, 3], [4, 5]]}));
    doc.remove("/m/0").unwrap();
    assert_document(&doc, json!({"m": [[4, 5]]}));
}

/// After removing element i of n, n-1 elements remain named 0..n-2.
#[test]
fn test_array_contiguity_every_position() {
    let original: Vec<serde_json::Value> = (0..6).map(|i| json!({"v": i})).collect();
    for i in 0..original.len() {
        let doc = create_test_doc();
        doc.add("/arr", serde_json::Value::Array(original.clone()), false)
            .unwrap();

        doc.remove(&format!("/arr/{}", i)).unwrap();

        let mut expected = original.clone();
        expected.remove(i);
        let names: Vec<String> = (0..expected.len()).map(|n| n.to_string()).collect();
        assert_eq!(doc.keys("/arr").unwrap(), names);
        assert_value(&doc, "/arr", serde_json::Value::Array(expected));
        assert_invariants(&doc);
    }
}

#[test]
fn test_remove_then_append_reuses_index() {
    let doc = create_test_doc();
    doc.add("/list", json!([1, 2, 3]), false).unwrap();
    doc.remove("/list/2").unwrap();
    assert_eq!(doc.add("/list/#", json!(4), false).unwrap(), "/list/2");
    doc.remove("/list/0").unwrap();
    assert_eq!(doc.add("/list/#", json!(5), false).unwrap(), "/list/2");
    assert_document(&doc, json!({"list": [2, 4, 5]}));
}

#[test]
#[ignore]
fn stress_long_array_drain_from_front() {
    let doc = create_test_doc();
    let items: Vec<i64> = (0..300).collect();
    doc.add("/q", json!(items), false).unwrap();
    for expected in 0..300i64 {
        assert_eq!(doc.get_int("/q/0").unwrap(), expected);
        doc.remove("/q/0").unwrap();
    }
    assert_document(&doc, json!({"q": []}));
}
