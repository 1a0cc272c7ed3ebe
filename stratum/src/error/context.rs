//! Human-readable provenance fragments for error messages.

use serde_json::Value;

use crate::node::{LayerMetadata, Node};

/// Metadata key rendered first as `at <path>`.
pub const KEYPATH_KEY: &str = "keypath";

/// Build the provenance fragment for `node`.
///
/// The fragment lists the node's key path first (`at Hello.World`) followed by
/// every other non-empty metadata entry as `<key> <value>`, for example
/// `(at Hello.World, file config.json)`. Scope annotations are never printed.
/// Nodes without provenance produce an empty string.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use stratum::{LayerMetadata, Root, context};
///
/// let mut root = Root::new();
/// root.add(
///     json!({"Hello": {"World": 1}}),
///     Some(LayerMetadata::file("config.json").with("keypath", "Hello.World")),
/// )?;
/// let merged = root.merged();
/// let node = merged.get("Hello").and_then(|hello| hello.get("World"));
/// assert_eq!(
///     node.map(context).as_deref(),
///     Some("(at Hello.World, file config.json)")
/// );
/// # Ok::<_, stratum::StratumError>(())
/// ```
#[must_use]
pub fn context(node: &Node) -> String {
    node.provenance().map_or_else(String::new, describe)
}

/// Render `metadata` as a parenthesised fragment.
pub(crate) fn describe(metadata: &LayerMetadata) -> String {
    let mut parts = Vec::new();
    if let Some(keypath) = metadata.get(KEYPATH_KEY).filter(|value| is_truthy(value)) {
        parts.push(format!("at {}", render_keypath(keypath)));
    }
    for (key, value) in metadata.iter() {
        if key == KEYPATH_KEY || !is_truthy(value) {
            continue;
        }
        parts.push(format!("{key} {}", render(value)));
    }
    if parts.is_empty() {
        return String::new();
    }
    format!("({})", parts.join(", "))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n.abs() > 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(entries) => !entries.is_empty(),
    }
}

fn render_keypath(value: &Value) -> String {
    match value {
        Value::Array(segments) => segments
            .iter()
            .map(render)
            .collect::<Vec<_>>()
            .join("."),
        other => render(other),
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
