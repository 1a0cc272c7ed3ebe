//! Unit tests for the annotated value model and scope builders.

use rstest::rstest;
use serde_json::{Map, Value, json};

use super::{Node, NodeValue, add_local_scope, add_scope};
use crate::{ErrorKind, StratumError};

fn bindings(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[test]
fn conversion_round_trips_plain_values() {
    let value = json!({"a": [1, {"b": null}], "c": "text", "d": true});
    let node = Node::from(value.clone());
    assert!(node.is_mapping());
    assert!(node.provenance().is_none());
    assert_eq!(node.to_value(), value);
}

#[test]
fn conversion_preserves_key_order() {
    let node = Node::from(json!({"z": 1, "a": 2, "m": 3}));
    let keys: Vec<&str> = node
        .entries()
        .map(|entries| entries.keys().map(String::as_str).collect())
        .unwrap_or_default();
    assert_eq!(keys, ["z", "a", "m"]);
}

#[rstest]
#[case(json!({}), "mapping")]
#[case(json!([]), "sequence")]
#[case(json!("x"), "string")]
#[case(json!(1.5), "number")]
#[case(json!(false), "boolean")]
#[case(json!(null), "null")]
fn names_node_kinds(#[case] value: Value, #[case] expected: &str) {
    assert_eq!(Node::from(value).kind_name(), expected);
}

#[test]
fn local_scope_marks_only_the_addressed_child() {
    let original = Node::from(json!({"a": {"x": 1}, "b": {"y": 2}}));
    let marked = original
        .clone()
        .with_local_scope("a")
        .expect("key exists");

    let flag = |node: &Node, key: &str| {
        node.get(key)
            .is_some_and(|child| child.annotations().local_scope())
    };
    assert!(flag(&marked, "a"));
    assert!(!flag(&marked, "b"));
    assert!(!flag(&original, "a"), "builder must not touch the original");
    assert_eq!(marked.to_value(), original.to_value());
}

#[test]
fn custom_scope_replaces_previous_bindings() {
    let node = add_scope(json!({"a": {}}), "a", bindings(json!({"x": 1})))
        .and_then(|node| node.with_scope("a", bindings(json!({"y": 2}))))
        .expect("key exists");
    let scope = node
        .get("a")
        .and_then(|child| child.annotations().custom_scope())
        .cloned();
    assert_eq!(scope, Some(bindings(json!({"y": 2}))));
}

#[rstest]
#[case(json!({"a": 1}), "b")]
#[case(json!("not a mapping"), "a")]
fn builders_reject_missing_keys(#[case] container: Value, #[case] key: &str) {
    let err = add_local_scope(container, key).expect_err("key is missing");
    assert_eq!(err.kind(), ErrorKind::MissingKey);
    assert!(matches!(err, StratumError::MissingKey { key: ref k } if k == key));
}

#[test]
fn sequences_hold_nodes() {
    let node = Node::from(json!([1, "two"]));
    let NodeValue::Sequence(items) = node.value() else {
        panic!("expected a sequence, got {node:?}");
    };
    assert_eq!(items.len(), 2);
}
