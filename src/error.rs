//! Error types.

use crate::store::ContextKey;
use thiserror::Error;

/// Errors reported by the name table and by context lookups.
///
/// Hook operations themselves never fail; a missing slot is the normal
/// first-render case.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HookError {
    /// No hook is exposed under this name.
    #[error("no hook is exposed under the name `{0}`")]
    UnknownHook(String),

    /// The context key has never been given a value.
    #[error("context `{0}` has no value")]
    ContextUnset(ContextKey),

    /// The context value was stored with a different type.
    #[error("context `{key}` does not hold a value of type `{expected}`")]
    ContextType {
        key: ContextKey,
        expected: &'static str,
    },

    /// The runtime owning the context store has been dropped.
    #[error("the runtime backing this handle has been dropped")]
    RuntimeDropped,
}

/// Result type for hookbox operations
pub type Result<T> = std::result::Result<T, HookError>;
