//! Caller-supplied provenance attached to a layer.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque metadata describing where a layer came from.
///
/// The record is only ever used to decorate error messages. Entries keep
/// their insertion order, which is the order they are printed in.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMetadata(Map<String, Value>);

impl LayerMetadata {
    /// Create an empty metadata record.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Metadata for a layer read from the file at `path`.
    #[must_use]
    pub fn file(path: impl Into<Utf8PathBuf>) -> Self {
        Self::new().with("file", path.into().as_str())
    }

    /// Metadata naming the key path a layer was mounted at.
    #[must_use]
    pub fn keypath(path: impl Into<String>) -> Self {
        Self::new().with(crate::error::KEYPATH_KEY, path.into())
    }

    /// Add or replace an entry, returning the updated record.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Iterate over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Returns `true` when the record holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for LayerMetadata {
    fn from(entries: Map<String, Value>) -> Self {
        Self(entries)
    }
}

impl<K, V> FromIterator<(K, V)> for LayerMetadata
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}
