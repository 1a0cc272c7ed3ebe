//! Effective name space visible at a node of the merged tree.
//!
//! The root scope is the merged tree's top-level keys, overlaid by the
//! caller's external scope. Walking down the tree, every node marked as a
//! local scope contributes its own keys and every node carrying a custom
//! scope contributes those bindings. Contributions are applied from the root
//! downwards, and within one node the custom scope is applied after the local
//! keys, so the closest and most explicit binding wins.

use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::node::Node;

/// Name bindings visible while expanding one node.
#[derive(Clone, Debug, PartialEq)]
pub struct Scope<'a> {
    bindings: Cow<'a, Map<String, Value>>,
}

impl Scope<'static> {
    /// Build the root scope for `tree`.
    ///
    /// `external` bindings win over top-level document keys of the same name.
    #[must_use]
    pub fn root(tree: &Node, external: Option<&Map<String, Value>>) -> Self {
        let mut bindings = match tree.to_value() {
            Value::Object(entries) => entries,
            _ => Map::new(),
        };
        if let Some(overrides) = external {
            overlay(&mut bindings, overrides);
        }
        Self {
            bindings: Cow::Owned(bindings),
        }
    }

    /// Compute the scope that applies to the node at `path` in `tree`.
    ///
    /// Returns `None` when `path` does not name a node.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use stratum::{Node, Scope};
    ///
    /// let tree = Node::from(json!({"db": {"host": "localhost", "url": "{host}"}}))
    ///     .with_local_scope("db")?;
    /// let scope = Scope::resolve(&tree, &["db", "url"], None);
    /// assert_eq!(
    ///     scope.as_ref().and_then(|s| s.get("host")),
    ///     Some(&json!("localhost"))
    /// );
    /// # Ok::<_, stratum::StratumError>(())
    /// ```
    #[must_use]
    pub fn resolve(
        tree: &Node,
        path: &[&str],
        external: Option<&Map<String, Value>>,
    ) -> Option<Self> {
        let mut scope = Self::root(tree, external).enter(tree).into_owned();
        let mut node = tree;
        for key in path {
            node = node.get(key)?;
            scope = scope.enter(node).into_owned();
        }
        Some(scope)
    }
}

impl Scope<'_> {
    /// Scope seen by `node` and its subtree, given that `self` is the scope of
    /// its parent.
    ///
    /// Borrows the parent's bindings when `node` carries no scope markers.
    #[must_use]
    pub fn enter(&self, node: &Node) -> Scope<'_> {
        let annotations = node.annotations();
        if !annotations.has_scope() {
            return Scope {
                bindings: Cow::Borrowed(self.bindings.as_ref()),
            };
        }
        let mut bindings = self.bindings.as_ref().clone();
        if annotations.local_scope() {
            for (key, child) in node.entries().into_iter().flatten() {
                bindings.insert(key.clone(), child.to_value());
            }
        }
        if let Some(custom) = annotations.custom_scope() {
            overlay(&mut bindings, custom);
        }
        Scope {
            bindings: Cow::Owned(bindings),
        }
    }

    /// Look up a binding by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// All bindings, as handed to the query evaluator.
    #[must_use]
    pub fn bindings(&self) -> &Map<String, Value> {
        &self.bindings
    }

    /// Detach the scope from the parent it borrows from.
    #[must_use]
    pub fn into_owned(self) -> Scope<'static> {
        Scope {
            bindings: Cow::Owned(self.bindings.into_owned()),
        }
    }
}

fn overlay(bindings: &mut Map<String, Value>, overrides: &Map<String, Value>) {
    for (name, value) in overrides {
        bindings.insert(name.clone(), value.clone());
    }
}
