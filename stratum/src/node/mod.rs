//! Annotated value model shared by layers, the merged tree, and the expander.
//!
//! A [`Node`] is an explicit `{value, annotations}` pair. Annotations carry the
//! provenance of the layer that produced the value plus the scope markers set
//! through the builders in this module. Converting back to a plain
//! [`serde_json::Value`] strips every annotation.

mod builder;
mod metadata;

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

pub use builder::{add_local_scope, add_scope};
pub use metadata::LayerMetadata;

/// Ordered children of a mapping node.
pub type Entries = IndexMap<String, Node>;

/// Payload of a [`Node`].
#[derive(Clone, Debug, PartialEq)]
pub enum NodeValue {
    /// String, number, boolean, or null.
    Scalar(Value),
    /// Ordered sequence of nodes.
    Sequence(Vec<Node>),
    /// Ordered mapping from key to node.
    Mapping(Entries),
}

/// Metadata carried by a single node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Annotations {
    provenance: Option<Arc<LayerMetadata>>,
    local_scope: bool,
    custom_scope: Option<Map<String, Value>>,
}

impl Annotations {
    /// Provenance of the layer that produced the node.
    #[must_use]
    pub fn provenance(&self) -> Option<&LayerMetadata> {
        self.provenance.as_deref()
    }

    /// Whether the node's own keys are visible by bare name in its subtree.
    #[must_use]
    pub const fn local_scope(&self) -> bool {
        self.local_scope
    }

    /// Explicit name bindings visible to the node's subtree.
    #[must_use]
    pub const fn custom_scope(&self) -> Option<&Map<String, Value>> {
        self.custom_scope.as_ref()
    }

    /// Returns `true` when the node changes the scope of its subtree.
    #[must_use]
    pub const fn has_scope(&self) -> bool {
        self.local_scope || self.custom_scope.is_some()
    }

    /// Combine the scope markers of `other` onto `self`; provenance is kept.
    pub(crate) fn absorb_scopes(&mut self, other: &Self) {
        self.local_scope |= other.local_scope;
        if let Some(incoming) = &other.custom_scope {
            let scope = self.custom_scope.get_or_insert_with(Map::new);
            for (name, value) in incoming {
                scope.insert(name.clone(), value.clone());
            }
        }
    }
}

/// A value plus the annotations attached to it.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    value: NodeValue,
    annotations: Annotations,
}

impl Node {
    /// Create an unannotated node.
    #[must_use]
    pub fn new(value: NodeValue) -> Self {
        Self {
            value,
            annotations: Annotations::default(),
        }
    }

    /// Create an empty, unannotated mapping node.
    #[must_use]
    pub fn empty_mapping() -> Self {
        Self::new(NodeValue::Mapping(Entries::new()))
    }

    /// Returns the node's payload.
    #[must_use]
    pub const fn value(&self) -> &NodeValue {
        &self.value
    }

    /// Returns the node's annotations.
    #[must_use]
    pub const fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// Provenance of the layer that produced the node.
    #[must_use]
    pub fn provenance(&self) -> Option<&LayerMetadata> {
        self.annotations.provenance()
    }

    /// Returns `true` when the node is a mapping.
    #[must_use]
    pub const fn is_mapping(&self) -> bool {
        matches!(self.value, NodeValue::Mapping(_))
    }

    /// Returns the mapping entries, if the node is a mapping.
    #[must_use]
    pub const fn entries(&self) -> Option<&Entries> {
        match &self.value {
            NodeValue::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up the child stored under `key` in a mapping node.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.entries().and_then(|entries| entries.get(key))
    }

    /// Human-readable name of the node's kind, used in error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match &self.value {
            NodeValue::Mapping(_) => "mapping",
            NodeValue::Sequence(_) => "sequence",
            NodeValue::Scalar(Value::String(_)) => "string",
            NodeValue::Scalar(Value::Number(_)) => "number",
            NodeValue::Scalar(Value::Bool(_)) => "boolean",
            NodeValue::Scalar(_) => "null",
        }
    }

    /// Strip every annotation, returning the plain value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match &self.value {
            NodeValue::Scalar(value) => value.clone(),
            NodeValue::Sequence(items) => Value::Array(items.iter().map(Self::to_value).collect()),
            NodeValue::Mapping(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(key, child)| (key.clone(), child.to_value()))
                    .collect(),
            ),
        }
    }

    /// Mark this node so its own keys are visible by bare name in its subtree.
    #[must_use]
    pub fn local_scope(mut self) -> Self {
        self.annotations.local_scope = true;
        self
    }

    /// Attach (or replace) the explicit bindings visible to this node's subtree.
    #[must_use]
    pub fn scoped(mut self, scope: Map<String, Value>) -> Self {
        self.annotations.custom_scope = Some(scope);
        self
    }

    /// Copy of this subtree with `provenance` stamped on every node.
    ///
    /// Scope markers set on the document are preserved.
    pub(crate) fn with_provenance(&self, provenance: Option<&Arc<LayerMetadata>>) -> Self {
        let value = match &self.value {
            NodeValue::Scalar(value) => NodeValue::Scalar(value.clone()),
            NodeValue::Sequence(items) => NodeValue::Sequence(
                items
                    .iter()
                    .map(|item| item.with_provenance(provenance))
                    .collect(),
            ),
            NodeValue::Mapping(entries) => NodeValue::Mapping(
                entries
                    .iter()
                    .map(|(key, child)| (key.clone(), child.with_provenance(provenance)))
                    .collect(),
            ),
        };
        Self {
            value,
            annotations: Annotations {
                provenance: provenance.cloned(),
                ..self.annotations.clone()
            },
        }
    }

    /// Empty mapping created on behalf of a layer, carrying its provenance.
    pub(crate) fn synthesized(provenance: Option<&Arc<LayerMetadata>>) -> Self {
        Self {
            value: NodeValue::Mapping(Entries::new()),
            annotations: Annotations {
                provenance: provenance.cloned(),
                ..Annotations::default()
            },
        }
    }

    pub(crate) const fn annotations_mut(&mut self) -> &mut Annotations {
        &mut self.annotations
    }

    pub(crate) const fn entries_mut(&mut self) -> Option<&mut Entries> {
        match &mut self.value {
            NodeValue::Mapping(entries) => Some(entries),
            _ => None,
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(entries) => Self::from(entries),
            Value::Array(items) => Self::new(NodeValue::Sequence(
                items.into_iter().map(Self::from).collect(),
            )),
            scalar => Self::new(NodeValue::Scalar(scalar)),
        }
    }
}

impl From<Map<String, Value>> for Node {
    fn from(entries: Map<String, Value>) -> Self {
        Self::new(NodeValue::Mapping(
            entries
                .into_iter()
                .map(|(key, value)| (key, Self::from(value)))
                .collect(),
        ))
    }
}

#[cfg(test)]
mod tests;
