//! Error types for wrapper construction

use serde_json::Value;
use thiserror::Error;

/// Configuration errors raised while building a wrapped function set
///
/// Errors returned by the wrapped target are never converted into this type;
/// they reach the caller unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum XfnError {
    /// A required argument position is missing, is not a non-negative integer,
    /// or exceeds `MAX_ARG_POSITION`. Integral floats such as `1.0` count as
    /// integers.
    #[error(
        "{field} must be an argument position (0..={}), found {found}",
        crate::config::MAX_ARG_POSITION
    )]
    InvalidIndex {
        /// Configuration field holding the position (`pluralArg`, `optionArg` or `sbo.arg`)
        field: &'static str,
        /// Value found in the configuration (`null` when absent)
        found: Value,
    },
    /// The plural and option positions refer to the same argument.
    #[error("pluralArg cannot be the same as optionArg (both are {index})")]
    ConflictingIndices {
        /// The shared argument position
        index: usize,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, XfnError>;
