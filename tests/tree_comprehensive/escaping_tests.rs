//! Path Escaping Tests
//!
//! Keys containing `/` or `\` are stored escaped and read back verbatim.

use crate::test_utils::*;
use arbor::{escape, unescape};

#[test]
fn test_escape_roundtrip_samples() {
    for key in ["", "plain", "a/b", "a\\b", "/", "\\", "\\/", "//\\\\", "#", "**ROOT**"] {
        assert_eq!(unescape(&escape(key)), key, "key {:?}", key);
    }
}

#[test]
fn test_slash_key_retrievable_by_escaped_path() {
    let doc = create_test_doc();
    doc.add("/o", json!({"a/b": 1, "a": {"b": 2}}), false).unwrap();

    assert_eq!(doc.get_int(&format!("/o/{}", escape("a/b"))).unwrap(), 1);
    assert_eq!(doc.get_int("/o/a/b").unwrap(), 2);
    assert_eq!(doc.keys("/o").unwrap(), vec!["a/b", "a"]);
    assert_document(&doc, json!({"o": {"a/b": 1, "a": {"b": 2}}}));
}

#[test]
fn test_backslash_key() {
    let doc = create_test_doc();
    let key = "C:\\temp\\";
    let path = format!("/{}", escape(key));
    assert_eq!(doc.add(&path, json!("dir"), false).unwrap(), path);
    assert_eq!(doc.get_string(&path).unwrap(), "dir");
    assert_eq!(doc.keys("/").unwrap(), vec![key]);
}

#[test]
fn test_escaped_trailing_slash_is_kept() {
    let doc = create_test_doc();
    doc.add("/dir\\/", json!(1), false).unwrap();
    assert!(doc.has("/dir\\/").unwrap());
    assert!(!doc.has("/dir").unwrap());
    assert_eq!(doc.keys("/").unwrap(), vec!["dir/"]);
}

#[test]
fn test_unescaped_trailing_slash_is_dropped() {
    let doc = create_test_doc();
    assert_eq!(doc.add("/dir/", json!({}), false).unwrap(), "/dir");
    assert!(doc.has("/dir").unwrap());
    assert_eq!(doc.add("/dir/x/", json!(1), false).unwrap(), "/dir/x");
}

#[test]
fn test_reserved_root_name_as_escaped_key() {
    let doc = create_test_doc();
    let err = doc.add(&format!("/{}", escape("**ROOT**")), json!(1), false).unwrap_err();
    assert!(matches!(err, ArborError::InvalidPath { .. }));
}

#[test]
fn test_unicode_keys() {
    let doc = create_test_doc();
    doc.add("/ключ", json!({"名前": "値", "emoji 🌳": [1]}), false).unwrap();
    assert_eq!(doc.get_string("/ключ/名前").unwrap(), "値");
    assert_eq!(doc.get_int("/ключ/emoji 🌳/0").unwrap(), 1);
    assert_invariants(&doc);
}
