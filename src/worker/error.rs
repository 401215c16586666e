//! Async worker error types.

use crate::core::StateKind;
use crate::store::StoreError;
use std::any::Any;
use thiserror::Error;

/// Errors raised while supervising state-keyed background work.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkerError {
    /// Deciding the task for a published state failed. Fatal for the
    /// binding: no further decisions are computed.
    #[error("Async worker failed to handle state '{state}': {message}")]
    SubscriptionFault { state: StateKind, message: String },

    /// A background task panicked. The machine may be stuck in the state
    /// that launched it.
    #[error("Async task #{epoch} launched for state '{state}' panicked: {message}")]
    TaskPanicked {
        state: StateKind,
        epoch: u64,
        message: String,
    },

    /// A cancelled or superseded task tried to feed a result back
    #[error("Async task #{epoch} is no longer current; its result was discarded")]
    StaleTask { epoch: u64 },

    #[error("Async worker must be bound from within a Tokio runtime")]
    NoRuntime,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
