//! Layered configuration documents with scoped placeholder expansion.
//!
//! A [`Root`] collects partial documents (for example defaults followed by
//! environment overrides) and deep-merges them in order. String values may
//! reference other parts of the merged tree, or caller-supplied bindings,
//! through `{expression}` placeholders; [`Root::expanded`] resolves them into a
//! single plain [`serde_json::Value`].
//!
//! ```rust
//! use serde_json::json;
//! use stratum::{LayerMetadata, Root};
//!
//! let mut root = Root::new();
//! root.add(
//!     json!({"host": "localhost", "port": 8080, "url": "http://{host}:{port}"}),
//!     Some(LayerMetadata::file("defaults.json")),
//! )?;
//! root.add(
//!     json!({"host": "example.org"}),
//!     Some(LayerMetadata::file("production.json")),
//! )?;
//!
//! let config = root.expanded(None)?;
//! assert_eq!(config["url"], "http://example.org:8080");
//! # Ok::<_, stratum::StratumError>(())
//! ```
//!
//! Placeholders are resolved against a lexical scope. The root scope holds
//! the merged document's top-level keys, overridden by any external scope
//! passed to [`Root::expanded`]. Nodes marked with
//! [`Node::with_local_scope`] expose their own keys by bare name to their
//! subtree, and nodes given bindings through [`Node::with_scope`] expose
//! those. `{{` and `}}` produce literal braces.

mod error;
mod expand;
mod node;
mod query;
mod root;
mod scope;

pub use error::{ErrorKind, KEYPATH_KEY, StratumError, StratumResult, context};
pub use expand::{Expander, TemplateSyntaxError};
pub use node::{
    Annotations, Entries, LayerMetadata, Node, NodeValue, add_local_scope, add_scope,
};
pub use query::{PathQuery, QueryError, QueryEvaluator};
pub use root::{Layer, Root};
pub use scope::Scope;

/// Re-export of `serde_json` so callers can build documents with the same
/// version the crate uses.
pub use serde_json;
