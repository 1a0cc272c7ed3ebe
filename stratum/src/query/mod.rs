//! Path query evaluation used to resolve placeholder expressions.
//!
//! The expander treats the evaluator as a black box: it hands over the
//! placeholder text and the current scope and receives either a value or
//! `None` for "not found". [`PathQuery`] is the built-in evaluator; any
//! closure with the right signature can stand in for it.

mod path;

use serde_json::{Map, Value};
use thiserror::Error;

pub use path::PathQuery;

/// Errors reported by a [`QueryEvaluator`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QueryError {
    /// The expression ended before a field or index was complete.
    #[error("unexpected end of expression at offset {offset}")]
    UnexpectedEnd {
        /// Byte offset into the expression.
        offset: usize,
    },

    /// The expression contains a character the grammar does not allow there.
    #[error("unexpected character '{found}' at offset {offset}")]
    UnexpectedCharacter {
        /// Offending character.
        found: char,
        /// Byte offset into the expression.
        offset: usize,
    },

    /// A quoted identifier has no closing quote.
    #[error("unterminated quoted identifier starting at offset {offset}")]
    UnterminatedQuote {
        /// Byte offset of the opening quote.
        offset: usize,
    },

    /// A sequence index is not a valid integer.
    #[error("invalid sequence index '{text}'")]
    InvalidIndex {
        /// Index text as written.
        text: String,
    },

    /// Failure reported by a caller-supplied evaluator.
    #[error("{0}")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl QueryError {
    /// Wrap an arbitrary evaluator failure.
    #[must_use]
    pub fn other(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Other(err.into())
    }
}

/// Resolves a placeholder expression against a scope.
pub trait QueryEvaluator {
    /// Evaluate `expression` against `scope`.
    ///
    /// Returns `Ok(None)` when the expression is well formed but selects
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns a [`QueryError`] when the expression cannot be evaluated, for
    /// example because it is syntactically invalid.
    fn evaluate(
        &self,
        expression: &str,
        scope: &Map<String, Value>,
    ) -> Result<Option<Value>, QueryError>;
}

impl<F> QueryEvaluator for F
where
    F: Fn(&str, &Map<String, Value>) -> Result<Option<Value>, QueryError>,
{
    fn evaluate(
        &self,
        expression: &str,
        scope: &Map<String, Value>,
    ) -> Result<Option<Value>, QueryError> {
        self(expression, scope)
    }
}

#[cfg(test)]
mod tests;
