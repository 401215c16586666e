//! Store error types.

use crate::core::StateKind;
use thiserror::Error;

/// Errors returned by [`Store`](super::Store) operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The store was closed by unbinding its feature
    #[error("Store is unbound; no further actions or state reads are accepted")]
    Unbound,

    /// No transition of the action matched, under
    /// [`UnmatchedPolicy::Reject`](super::UnmatchedPolicy::Reject)
    #[error("Action '{action}' has no transition matching state '{state}'")]
    NoMatchingTransition { action: String, state: StateKind },

    /// A transform produced a value of a different kind than it declared
    #[error("Action '{action}' declared a transition to '{expected}' but its transform produced '{actual}'")]
    TargetMismatch {
        action: String,
        expected: StateKind,
        actual: StateKind,
    },
}
