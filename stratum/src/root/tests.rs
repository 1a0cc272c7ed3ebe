//! Unit tests for layer storage and deep merging.

use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::Root;
use crate::{ErrorKind, LayerMetadata, Node};

fn layer_tag(node: Option<&Node>) -> Option<Value> {
    node.and_then(Node::provenance)
        .and_then(|meta| meta.get("test"))
        .cloned()
}

#[fixture]
fn two_layers() -> Root {
    let mut root = Root::new();
    root.add(
        json!({"Value": 42, "Hello": "World"}),
        Some(LayerMetadata::new().with("test", 42)),
    )
    .expect("mapping layer");
    root.add(
        json!({"Hello": "World2"}),
        Some(LayerMetadata::new().with("test", 43)),
    )
    .expect("mapping layer");
    root
}

#[test]
fn single_layer_merges_to_itself() {
    let document = json!({"Value": 42, "Hello": "World"});
    let root = Root::from_documents([document.clone()]).expect("mapping layer");
    assert_eq!(root.merged().to_value(), document);
}

#[rstest]
fn later_layers_win_and_keep_their_provenance(two_layers: Root) {
    let merged = two_layers.merged();
    assert_eq!(merged.to_value(), json!({"Value": 42, "Hello": "World2"}));
    assert_eq!(layer_tag(merged.get("Value")), Some(json!(42)));
    assert_eq!(layer_tag(merged.get("Hello")), Some(json!(43)));
}

#[rstest]
fn merging_leaves_layers_untouched(two_layers: Root) {
    let before: Vec<Value> = two_layers
        .layers()
        .iter()
        .map(|layer| layer.document().to_value())
        .collect();
    let first = two_layers.merged();
    let second = two_layers.merged();
    let after: Vec<Value> = two_layers
        .layers()
        .iter()
        .map(|layer| layer.document().to_value())
        .collect();
    assert_eq!(before, after);
    assert_eq!(first, second);
    assert!(
        two_layers
            .layers()
            .iter()
            .all(|layer| layer.document().provenance().is_none())
    );
}

#[test]
fn mappings_merge_deeply() {
    let root = Root::from_documents([json!({"A": {"B": 1}}), json!({"A": {"C": 2}})])
        .expect("mapping layers");
    assert_eq!(root.merged().to_value(), json!({"A": {"B": 1, "C": 2}}));
}

#[rstest]
#[case::sequence_replaces_sequence(json!({"a": [1, 2]}), json!({"a": [3]}), json!({"a": [3]}))]
#[case::scalar_replaces_mapping(json!({"a": {"b": 1}}), json!({"a": 5}), json!({"a": 5}))]
#[case::mapping_replaces_scalar(json!({"a": 5}), json!({"a": {"b": 1}}), json!({"a": {"b": 1}}))]
#[case::sequence_replaces_mapping(json!({"a": {"b": 1}}), json!({"a": [1]}), json!({"a": [1]}))]
fn non_mappings_replace_wholesale(
    #[case] first: Value,
    #[case] second: Value,
    #[case] expected: Value,
) {
    let root = Root::from_documents([first, second]).expect("mapping layers");
    assert_eq!(root.merged().to_value(), expected);
}

#[test]
fn synthesized_mappings_keep_their_first_provenance() {
    let mut root = Root::new();
    root.add(
        json!({"A": {"B": 1}}),
        Some(LayerMetadata::new().with("test", 1)),
    )
    .expect("mapping layer");
    root.add(
        json!({"A": {"C": 2}}),
        Some(LayerMetadata::new().with("test", 2)),
    )
    .expect("mapping layer");

    let merged = root.merged();
    let a = merged.get("A");
    assert_eq!(layer_tag(a), Some(json!(1)));
    assert_eq!(layer_tag(a.and_then(|node| node.get("B"))), Some(json!(1)));
    assert_eq!(layer_tag(a.and_then(|node| node.get("C"))), Some(json!(2)));
}

#[test]
fn replaced_scalar_takes_over_the_incoming_provenance() {
    let mut root = Root::new();
    root.add(json!({"A": 1}), Some(LayerMetadata::new().with("test", 1)))
        .expect("mapping layer");
    root.add(
        json!({"A": {"B": 2}}),
        Some(LayerMetadata::new().with("test", 2)),
    )
    .expect("mapping layer");
    let merged = root.merged();
    assert_eq!(layer_tag(merged.get("A")), Some(json!(2)));
}

#[test]
fn later_scope_markers_are_combined_onto_existing_mappings() {
    let mut root = Root::new();
    root.add(json!({"A": {"B": 1}}), None).expect("mapping layer");
    let marked = Node::from(json!({"A": {"C": 2}}))
        .with_local_scope("A")
        .expect("key exists");
    root.add(marked, None).expect("mapping layer");

    let merged = root.merged();
    assert!(
        merged
            .get("A")
            .is_some_and(|node| node.annotations().local_scope())
    );
}

#[rstest]
#[case(json!("text"), "string")]
#[case(json!([1, 2]), "sequence")]
#[case(json!(null), "null")]
#[case(json!(3), "number")]
fn add_rejects_non_mappings(#[case] document: Value, #[case] found: &str) {
    let mut root = Root::new();
    let err = root.add(document, None).expect_err("not a mapping");
    assert_eq!(err.kind(), ErrorKind::InvalidDocument);
    assert_eq!(
        err.to_string(),
        format!("can only add mapping documents to a root, found {found}")
    );
    assert!(root.is_empty());
}
