//! Ordered layer collection and its merged, expanded views.
//!
//! A [`Root`] owns the documents added to it. Later layers override earlier
//! ones: mappings merge key by key, everything else is replaced wholesale.
//! The merged tree is rebuilt on every call, so neither [`Root::merged`] nor
//! [`Root::expanded`] ever mutates the stored layers.

mod merge;

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::expand::Expander;
use crate::node::{LayerMetadata, Node};
use crate::{StratumError, StratumResult};

/// One input document plus the metadata describing where it came from.
#[derive(Clone, Debug)]
pub struct Layer {
    document: Node,
    metadata: Option<Arc<LayerMetadata>>,
}

impl Layer {
    /// Returns the layer's document.
    #[must_use]
    pub const fn document(&self) -> &Node {
        &self.document
    }

    /// Returns the metadata supplied with the layer.
    #[must_use]
    pub fn metadata(&self) -> Option<&LayerMetadata> {
        self.metadata.as_deref()
    }

    const fn metadata_arc(&self) -> Option<&Arc<LayerMetadata>> {
        self.metadata.as_ref()
    }
}

/// Ordered, append-only collection of layers.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use stratum::Root;
///
/// let mut root = Root::new();
/// root.add(json!({"Value": 42, "Hello": "World"}), None)?;
/// root.add(json!({"Hello": "{Value}!"}), None)?;
///
/// let expanded = root.expanded(None)?;
/// assert_eq!(expanded, json!({"Value": 42, "Hello": "42!"}));
/// # Ok::<_, stratum::StratumError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Root {
    layers: Vec<Layer>,
}

impl Root {
    /// Create an empty root.
    #[must_use]
    pub const fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Create a root holding `documents`, in order, without metadata.
    ///
    /// # Errors
    ///
    /// Returns [`StratumError::InvalidDocument`] for the first document that
    /// is not a mapping.
    pub fn from_documents<I, D>(documents: I) -> StratumResult<Self>
    where
        I: IntoIterator<Item = D>,
        D: Into<Node>,
    {
        let mut root = Self::new();
        for document in documents {
            root.add(document, None)?;
        }
        Ok(root)
    }

    /// Append a layer. Later layers override earlier ones.
    ///
    /// `metadata` is only used to give error messages context, for example
    /// the file the document was loaded from.
    ///
    /// # Errors
    ///
    /// Returns [`StratumError::InvalidDocument`] when `document` is not a
    /// mapping; the root is left unchanged.
    pub fn add(
        &mut self,
        document: impl Into<Node>,
        metadata: Option<LayerMetadata>,
    ) -> StratumResult<()> {
        let document = document.into();
        if !document.is_mapping() {
            return Err(StratumError::InvalidDocument {
                found: document.kind_name(),
            });
        }
        tracing::debug!(
            index = self.layers.len(),
            metadata = ?metadata,
            "adding configuration layer"
        );
        self.layers.push(Layer {
            document,
            metadata: metadata.map(Arc::new),
        });
        Ok(())
    }

    /// Returns the layers in insertion order.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Number of layers added so far.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` when no layers have been added.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Deep-merge every layer into a fresh annotated tree.
    #[must_use]
    pub fn merged(&self) -> Node {
        merge::merge_layers(&self.layers)
    }

    /// Merge the layers and expand every placeholder using the built-in path
    /// query evaluator.
    ///
    /// `scope` holds extra bindings that override top-level document keys for
    /// the whole call.
    ///
    /// # Errors
    ///
    /// Returns the first [`StratumError`] raised while expanding; no partial
    /// tree is produced.
    pub fn expanded(&self, scope: Option<&Map<String, Value>>) -> StratumResult<Value> {
        self.expanded_with(&Expander::default(), scope)
    }

    /// Merge the layers and expand them with a configured [`Expander`].
    ///
    /// # Errors
    ///
    /// Returns the first [`StratumError`] raised while expanding.
    pub fn expanded_with(
        &self,
        expander: &Expander<'_>,
        scope: Option<&Map<String, Value>>,
    ) -> StratumResult<Value> {
        tracing::debug!(layers = self.layers.len(), "expanding configuration root");
        expander.expand(&self.merged(), scope)
    }
}

#[cfg(test)]
mod tests;
