//! Error types produced while merging and expanding layered documents.

mod context;
mod types;

pub use context::{KEYPATH_KEY, context};
pub use types::{ErrorKind, StratumError};

pub(crate) use context::describe;

/// Result alias used throughout the crate.
pub type StratumResult<T> = Result<T, StratumError>;
