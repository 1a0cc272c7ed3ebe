//! Placeholder expansion over a merged tree.
//!
//! Strings containing `{` are templates. Each placeholder is resolved against
//! the scope in effect at the node being expanded; substituted strings that
//! are themselves templates are expanded again with the same scope. Every
//! template in the current chain is kept on an in-progress stack, and
//! re-entering one raises [`StratumError::CyclicDefinition`].

mod template;

use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::error::describe;
use crate::node::{Node, NodeValue};
use crate::query::{PathQuery, QueryEvaluator};
use crate::scope::Scope;
use crate::{StratumError, StratumResult};

pub use template::TemplateSyntaxError;

use template::{Piece, tokenise};

/// Expands placeholders in a merged tree.
///
/// The default expander resolves placeholders with [`PathQuery`] and
/// substitutes values unquoted.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use stratum::{Expander, Root};
///
/// let root = Root::from_documents([json!({"name": "demo", "cmd": "run {name}"})])?;
/// let expanded = root.expanded_with(&Expander::default().quoted(true), None)?;
/// assert_eq!(expanded["cmd"], "run \"demo\"");
/// # Ok::<_, stratum::StratumError>(())
/// ```
#[derive(Clone, Copy)]
pub struct Expander<'e> {
    evaluator: &'e dyn QueryEvaluator,
    quoted: bool,
}

impl Default for Expander<'static> {
    fn default() -> Self {
        Self::new(&PathQuery)
    }
}

impl std::fmt::Debug for Expander<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Expander")
            .field("evaluator", &"<evaluator>")
            .field("quoted", &self.quoted)
            .finish()
    }
}

impl<'e> Expander<'e> {
    /// Create an expander that resolves placeholders with `evaluator`.
    #[must_use]
    pub const fn new(evaluator: &'e dyn QueryEvaluator) -> Self {
        Self {
            evaluator,
            quoted: false,
        }
    }

    /// Wrap every substituted value in double quotes.
    #[must_use]
    pub const fn quoted(mut self, quoted: bool) -> Self {
        self.quoted = quoted;
        self
    }

    /// Expand `tree` into a plain value.
    ///
    /// `external` bindings override top-level keys of `tree` in the root
    /// scope for the whole call.
    ///
    /// # Errors
    ///
    /// Returns the first failure met during the depth-first walk. Failures
    /// raised at a node with provenance are wrapped in
    /// [`StratumError::Expansion`].
    pub fn expand(
        &self,
        tree: &Node,
        external: Option<&Map<String, Value>>,
    ) -> StratumResult<Value> {
        let scope = Scope::root(tree, external);
        self.expand_node(tree, &scope)
    }

    fn expand_node(&self, node: &Node, parent: &Scope<'_>) -> StratumResult<Value> {
        let scope = parent.enter(node);
        match node.value() {
            NodeValue::Mapping(entries) => {
                let mut expanded = Map::new();
                for (key, child) in entries {
                    expanded.insert(key.clone(), self.expand_node(child, &scope)?);
                }
                Ok(Value::Object(expanded))
            }
            NodeValue::Sequence(items) => items
                .iter()
                .map(|item| self.expand_node(item, &scope))
                .collect::<StratumResult<Vec<_>>>()
                .map(Value::Array),
            NodeValue::Scalar(Value::String(text)) if text.contains('{') => {
                let mut chain = Vec::new();
                self.render(text, &scope, &mut chain)
                    .map(Value::String)
                    .map_err(|err| {
                        let context = node.provenance().map(describe).unwrap_or_default();
                        err.in_template(text, context)
                    })
            }
            NodeValue::Scalar(value) => Ok(value.clone()),
        }
    }

    fn render(
        &self,
        template: &str,
        scope: &Scope<'_>,
        chain: &mut Vec<String>,
    ) -> StratumResult<String> {
        if chain.iter().any(|active| active == template) {
            tracing::debug!(template, depth = chain.len(), "cyclic definition detected");
            return Err(StratumError::CyclicDefinition {
                template: template.to_owned(),
            });
        }
        chain.push(template.to_owned());
        let mut rendered = String::with_capacity(template.len());
        for piece in tokenise(template)? {
            match piece {
                Piece::Literal(text) => rendered.push_str(&text),
                Piece::Placeholder(expression) => {
                    let value = self.substitute(&expression, scope, chain)?;
                    if self.quoted {
                        rendered.push('"');
                        rendered.push_str(&value);
                        rendered.push('"');
                    } else {
                        rendered.push_str(&value);
                    }
                }
            }
        }
        chain.pop();
        Ok(rendered)
    }

    fn substitute(
        &self,
        expression: &str,
        scope: &Scope<'_>,
        chain: &mut Vec<String>,
    ) -> StratumResult<String> {
        let value = self.resolve(expression, scope)?;
        tracing::trace!(expression, value = %value, "resolved placeholder");
        match value.as_ref() {
            Value::Object(_) => Err(StratumError::NotScalar {
                expression: expression.to_owned(),
            }),
            Value::Array(items) => {
                let mut parts = Vec::with_capacity(items.len());
                for item in items {
                    parts.push(self.stringify(item, scope, chain)?);
                }
                Ok(parts.join(" ").trim().to_owned())
            }
            scalar => self.stringify(scalar, scope, chain),
        }
    }

    fn resolve<'s>(
        &self,
        expression: &str,
        scope: &'s Scope<'_>,
    ) -> StratumResult<Cow<'s, Value>> {
        if let Some(value) = scope.get(expression) {
            return Ok(Cow::Borrowed(value));
        }
        self.evaluator
            .evaluate(expression, scope.bindings())
            .map_err(|source| StratumError::Evaluator {
                expression: expression.to_owned(),
                source,
            })?
            .map(Cow::Owned)
            .ok_or_else(|| StratumError::UnresolvedReference {
                expression: expression.to_owned(),
            })
    }

    fn stringify(
        &self,
        value: &Value,
        scope: &Scope<'_>,
        chain: &mut Vec<String>,
    ) -> StratumResult<String> {
        match value {
            Value::String(text) if text.contains('{') => self.render(text, scope, chain),
            Value::String(text) => Ok(text.clone()),
            Value::Null => Ok(String::new()),
            other => Ok(other.to_string()),
        }
    }
}
