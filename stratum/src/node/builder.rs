//! Builders attaching scope markers to the children of a mapping.
//!
//! Every builder consumes its container and returns an annotated copy; the
//! caller's original data is never reached through an alias.

use serde_json::{Map, Value};

use crate::{StratumError, StratumResult};

use super::Node;

impl Node {
    /// Return this mapping with `key`'s node marked as a local scope.
    ///
    /// Templates inside the marked subtree may then refer to the marked node's
    /// keys by bare name.
    ///
    /// # Errors
    ///
    /// Returns [`StratumError::MissingKey`] when `self` is not a mapping or
    /// has no entry for `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use stratum::{Node, Root};
    ///
    /// let document = Node::from(json!({
    ///     "server": {"host": "example.org", "url": "https://{host}/"}
    /// }))
    /// .with_local_scope("server")?;
    ///
    /// let mut root = Root::new();
    /// root.add(document, None)?;
    /// let expanded = root.expanded(None)?;
    /// assert_eq!(expanded["server"]["url"], "https://example.org/");
    /// # Ok::<_, stratum::StratumError>(())
    /// ```
    pub fn with_local_scope(self, key: &str) -> StratumResult<Self> {
        self.map_child(key, Self::local_scope)
    }

    /// Return this mapping with `scope` attached to `key`'s node, replacing
    /// any scope attached earlier.
    ///
    /// # Errors
    ///
    /// Returns [`StratumError::MissingKey`] when `self` is not a mapping or
    /// has no entry for `key`.
    pub fn with_scope(self, key: &str, scope: Map<String, Value>) -> StratumResult<Self> {
        self.map_child(key, |child| child.scoped(scope))
    }

    /// Return this mapping with `child` stored under `key`, replacing any
    /// existing entry.
    ///
    /// Use this to nest annotated subtrees, since annotations cannot be
    /// expressed in a plain [`serde_json::Value`].
    ///
    /// # Errors
    ///
    /// Returns [`StratumError::InvalidDocument`] when `self` is not a mapping.
    pub fn with_entry(
        mut self,
        key: impl Into<String>,
        child: impl Into<Self>,
    ) -> StratumResult<Self> {
        let found = self.kind_name();
        let Some(entries) = self.entries_mut() else {
            return Err(StratumError::InvalidDocument { found });
        };
        entries.insert(key.into(), child.into());
        Ok(self)
    }

    fn map_child<F>(mut self, key: &str, annotate: F) -> StratumResult<Self>
    where
        F: FnOnce(Self) -> Self,
    {
        let Some(slot) = self.entries_mut().and_then(|entries| entries.get_mut(key)) else {
            return Err(StratumError::MissingKey {
                key: key.to_owned(),
            });
        };
        let child = std::mem::replace(slot, Self::empty_mapping());
        *slot = annotate(child);
        Ok(self)
    }
}

/// Mark `container[key]` as a local scope. See [`Node::with_local_scope`].
///
/// # Errors
///
/// Returns [`StratumError::MissingKey`] when `key` is absent.
pub fn add_local_scope(container: impl Into<Node>, key: &str) -> StratumResult<Node> {
    container.into().with_local_scope(key)
}

/// Attach `scope` to `container[key]`. See [`Node::with_scope`].
///
/// # Errors
///
/// Returns [`StratumError::MissingKey`] when `key` is absent.
pub fn add_scope(
    container: impl Into<Node>,
    key: &str,
    scope: Map<String, Value>,
) -> StratumResult<Node> {
    container.into().with_scope(key, scope)
}
