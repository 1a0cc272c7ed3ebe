//! Primary error enum for merge and expansion flows.

use thiserror::Error;

use crate::expand::TemplateSyntaxError;
use crate::query::QueryError;

/// Errors that can occur while building a root or expanding it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StratumError {
    /// A layer document was not a mapping.
    #[error("can only add mapping documents to a root, found {found}")]
    InvalidDocument {
        /// Kind of value that was supplied instead.
        found: &'static str,
    },

    /// A scope builder addressed a key the container does not have.
    #[error("cannot annotate missing key '{key}'")]
    MissingKey {
        /// Key that was requested.
        key: String,
    },

    /// A template string is not well formed.
    #[error("malformed template: {source}")]
    MalformedTemplate {
        /// Description of the syntax problem.
        #[from]
        source: TemplateSyntaxError,
    },

    /// A placeholder expression did not resolve to anything.
    #[error("unable to resolve '{expression}'")]
    UnresolvedReference {
        /// Placeholder expression as written in the template.
        expression: String,
    },

    /// A placeholder expression resolved to a mapping.
    #[error("'{expression}' is not a scalar value")]
    NotScalar {
        /// Placeholder expression as written in the template.
        expression: String,
    },

    /// Expanding a template re-entered a template already in progress.
    #[error("cyclic definition re-enters '{template}'")]
    CyclicDefinition {
        /// Template that was re-entered.
        template: String,
    },

    /// The query evaluator rejected a placeholder expression.
    #[error("failed to evaluate '{expression}': {source}")]
    Evaluator {
        /// Placeholder expression handed to the evaluator.
        expression: String,
        /// Error reported by the evaluator.
        #[source]
        source: QueryError,
    },

    /// A failure raised while expanding a node that carries provenance.
    #[error("{source} when expanding '{template}' {context}")]
    Expansion {
        /// Template stored at the failing node.
        template: String,
        /// Provenance fragment describing where the node came from.
        context: String,
        /// Classified failure.
        #[source]
        source: Box<StratumError>,
    },
}

/// Classification of a [`StratumError`], independent of any context wrapping.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// See [`StratumError::InvalidDocument`].
    InvalidDocument,
    /// See [`StratumError::MissingKey`].
    MissingKey,
    /// See [`StratumError::MalformedTemplate`].
    MalformedTemplate,
    /// See [`StratumError::UnresolvedReference`].
    UnresolvedReference,
    /// See [`StratumError::NotScalar`].
    NotScalar,
    /// See [`StratumError::CyclicDefinition`].
    CyclicDefinition,
    /// See [`StratumError::Evaluator`].
    Evaluator,
}

impl StratumError {
    /// Returns the classification of this error.
    ///
    /// [`StratumError::Expansion`] wrappers are looked through, so the kind is
    /// the kind of the underlying failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum::{ErrorKind, StratumError};
    ///
    /// let err = StratumError::UnresolvedReference { expression: "Hello".into() };
    /// assert_eq!(err.kind(), ErrorKind::UnresolvedReference);
    /// ```
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDocument { .. } => ErrorKind::InvalidDocument,
            Self::MissingKey { .. } => ErrorKind::MissingKey,
            Self::MalformedTemplate { .. } => ErrorKind::MalformedTemplate,
            Self::UnresolvedReference { .. } => ErrorKind::UnresolvedReference,
            Self::NotScalar { .. } => ErrorKind::NotScalar,
            Self::CyclicDefinition { .. } => ErrorKind::CyclicDefinition,
            Self::Evaluator { .. } => ErrorKind::Evaluator,
            Self::Expansion { source, .. } => source.kind(),
        }
    }

    /// Returns the provenance fragment attached to this error, if any.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::Expansion { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Returns the classified failure beneath any context wrapping.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Expansion { source, .. } => source.root_cause(),
            _ => self,
        }
    }

    /// Wrap `self` with the template and provenance fragment of the node that
    /// was being expanded.
    ///
    /// An empty fragment leaves the error bare.
    #[must_use]
    pub(crate) fn in_template(self, template: &str, context: String) -> Self {
        if context.is_empty() {
            return self;
        }
        Self::Expansion {
            template: template.to_owned(),
            context,
            source: Box::new(self),
        }
    }
}
