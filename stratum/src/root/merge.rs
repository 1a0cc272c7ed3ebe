//! Deep-merge mechanics for annotated layers.

use std::sync::Arc;

use crate::node::{Entries, LayerMetadata, Node, NodeValue};

use super::Layer;

/// Merge `layers` in order into a fresh annotated tree.
///
/// The layer documents are only read; every node in the result is a copy.
pub(crate) fn merge_layers(layers: &[Layer]) -> Node {
    let mut merged = Node::empty_mapping();
    for layer in layers {
        merge_value(&mut merged, layer.document(), layer.metadata_arc());
    }
    merged
}

/// Overlay `layer` onto `target`, updating `target` in place.
///
/// Behaviour:
/// - When merging a mapping into a non-mapping target, the target is replaced
///   by an empty mapping stamped with the incoming provenance first.
/// - Mappings are merged recursively. The target mapping keeps its own
///   provenance; only the incoming scope markers are combined onto it.
/// - Sequences and scalars replace `target` wholesale, carrying the incoming
///   provenance.
pub(crate) fn merge_value(target: &mut Node, layer: &Node, provenance: Option<&Arc<LayerMetadata>>) {
    match layer.value() {
        NodeValue::Mapping(entries) => {
            merge_mapping(target, entries, provenance);
            target.annotations_mut().absorb_scopes(layer.annotations());
        }
        NodeValue::Sequence(_) | NodeValue::Scalar(_) => {
            *target = layer.with_provenance(provenance);
        }
    }
}

fn merge_mapping(target: &mut Node, entries: &Entries, provenance: Option<&Arc<LayerMetadata>>) {
    if !target.is_mapping() {
        *target = Node::synthesized(provenance);
    }

    let Some(target_entries) = target.entries_mut() else {
        return;
    };

    for (key, value) in entries {
        match target_entries.get_mut(key) {
            Some(existing) => merge_value(existing, value, provenance),
            None => {
                let mut slot = Node::synthesized(provenance);
                merge_value(&mut slot, value, provenance);
                target_entries.insert(key.clone(), slot);
            }
        }
    }
}
