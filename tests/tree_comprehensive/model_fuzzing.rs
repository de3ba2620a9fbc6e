//! Model-Based Fuzzing
//!
//! Random sequences of add / update / remove / append run against both a
//! document and a plain `serde_json::Value`. After every step the stored
//! rows must pass `verify()` and the document must read back equal to the
//! model.

use crate::test_utils::*;
use proptest::prelude::*;
use serde_json::{Map, Value};

const KEYS: &[&str] = &["a", "b", "c/d", "e\\f"];

#[derive(Debug, Clone)]
enum Op {
    Add(usize, Value),
    Update(usize, Value),
    Remove(usize),
    Append(Value),
    RemoveAt(usize),
    UpdateAt(usize, Value),
}

fn leaf_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000i64..1000).prop_map(Value::from),
        "[a-z]{0,6}".prop_map(Value::String),
        (-100.0f64..100.0).prop_map(|f| json!(f)),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    leaf_value().prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec(("[a-z/]{1,4}", inner), 0..4).prop_map(|members| {
                Value::Object(members.into_iter().collect::<Map<String, Value>>())
            }),
        ]
    })
}

fn op() -> impl Strategy<Value = Op> {
    let key = 0..KEYS.len();
    prop_oneof![
        (key.clone(), value()).prop_map(|(k, v)| Op::Add(k, v)),
        (key.clone(), value()).prop_map(|(k, v)| Op::Update(k, v)),
        key.prop_map(Op::Remove),
        value().prop_map(Op::Append),
        (0usize..6).prop_map(Op::RemoveAt),
        ((0usize..6), value()).prop_map(|(i, v)| Op::UpdateAt(i, v)),
    ]
}

fn key_path(k: usize) -> String {
    format!("/{}", arbor::escape(KEYS[k]))
}

/// Apply `op` to the document and the model, checking the document's
/// outcome against what the model predicts.
fn apply(doc: &Document, model: &mut Map<String, Value>, op: Op) {
    match op {
        Op::Add(k, v) => {
            let result = doc.add(&key_path(k), v.clone(), false);
            if model.contains_key(KEYS[k]) {
                assert!(result.unwrap_err().is_already_exists());
            } else {
                result.unwrap();
                model.insert(KEYS[k].to_string(), v);
            }
        }
        Op::Update(k, v) => {
            doc.update(&key_path(k), v.clone(), false).unwrap();
            // Existing keys keep their position; new keys go last.
            model.insert(KEYS[k].to_string(), v);
        }
        Op::Remove(k) => {
            let result = doc.remove(&key_path(k));
            if model.contains_key(KEYS[k]) {
                result.unwrap();
                *model = model
                    .iter()
                    .filter(|(key, _)| key.as_str() != KEYS[k])
                    .map(|(key, v)| (key.clone(), v.clone()))
                    .collect();
            } else {
                assert!(result.unwrap_err().is_not_found());
            }
        }
        Op::Append(v) => {
            let stored = doc.add("/list/#", v.clone(), false).unwrap();
            let list = list_mut(model);
            assert_eq!(stored, format!("/list/{}", list.len()));
            list.push(v);
        }
        Op::RemoveAt(i) => {
            let result = doc.remove(&format!("/list/{}", i));
            let list = list_mut(model);
            if i < list.len() {
                result.unwrap();
                list.remove(i);
            } else {
                assert!(result.unwrap_err().is_not_found());
            }
        }
        Op::UpdateAt(i, v) => {
            let result = doc.update(&format!("/list/{}", i), v.clone(), false);
            let list = list_mut(model);
            if i < list.len() {
                result.unwrap();
                list[i] = v;
            } else {
                // Absent indices go through insert, which refuses explicit names.
                assert!(matches!(result, Err(ArborError::InvalidPath { .. })));
            }
        }
    }
}

fn list_mut(model: &mut Map<String, Value>) -> &mut Vec<Value> {
    match model.get_mut("list") {
        Some(Value::Array(items)) => items,
        _ => panic!("model lost its list"),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn fuzz_operations_match_model(ops in prop::collection::vec(op(), 1..24)) {
        let doc = create_test_doc();
        doc.add("/list", json!([]), false).unwrap();
        let mut model = Map::new();
        model.insert("list".to_string(), json!([]));

        for op in ops {
            apply(&doc, &mut model, op);
            assert_invariants(&doc);
            prop_assert_eq!(doc.get("/").unwrap().into_inner(), Value::Object(model.clone()));
        }
    }

    #[test]
    fn fuzz_round_trip(v in value()) {
        let doc = create_test_doc();
        doc.add("/v", v.clone(), false).unwrap();
        prop_assert_eq!(doc.get("/v").unwrap().into_inner(), v.clone());
        prop_assert_eq!(doc.node_count().unwrap(), 1 + stored_nodes(&v));
        assert_invariants(&doc);
    }

    #[test]
    fn fuzz_escaped_key_round_trip(key in "\\PC{1,12}") {
        prop_assume!(key != "**ROOT**" && key != "#");
        let doc = create_test_doc();
        let path = format!("/{}", arbor::escape(&key));
        prop_assert_eq!(doc.add(&path, json!(1), false).unwrap(), path.clone());
        prop_assert_eq!(doc.keys("/").unwrap(), vec![key]);
        prop_assert_eq!(doc.get_int(&path).unwrap(), 1);
    }
}
