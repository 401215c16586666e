//! Transition dispatch engine.
//!
//! The [`Store`] owns the machine's single current state. Applying an
//! action selects the first transition, in declaration order, whose source
//! kind matches and whose guard passes, replaces the state with the
//! transform's result and publishes it to every subscriber.
//!
//! Read, select, transform, write and publish happen under one lock, so
//! concurrent `apply` calls are totally ordered and never compute from a
//! stale state. Publishing pushes into unbounded per-subscriber channels and
//! never waits on a slow observer.

mod error;
mod stream;

pub use error::StoreError;
pub use stream::StateStream;

use crate::action::Action;
use crate::core::{State, StateHistory, StateTransition, DEFAULT_HISTORY_LIMIT};
use chrono::Utc;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

/// What to do when an action has no transition for the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmatchedPolicy {
    /// Leave the state unchanged and report it in the outcome only
    #[default]
    Ignore,

    /// Same as `Ignore`, plus a warning log
    Warn,

    /// Fail the call with [`StoreError::NoMatchingTransition`]
    Reject,
}

/// Store configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    pub unmatched: UnmatchedPolicy,
    /// Number of applied transitions kept for diagnostics
    pub history_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            unmatched: UnmatchedPolicy::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// Result of applying one action.
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome<S: State> {
    /// A transition was selected and the new state published
    Transitioned {
        from: S,
        to: S,
        action: String,
        /// Index of the selected transition in the action's list
        transition: usize,
        sequence: u64,
    },

    /// Nothing matched; the state is unchanged
    Unmatched { state: S, action: String },
}

impl<S: State> ApplyOutcome<S> {
    /// The state after the call.
    pub fn state(&self) -> &S {
        match self {
            Self::Transitioned { to, .. } => to,
            Self::Unmatched { state, .. } => state,
        }
    }

    pub fn is_transitioned(&self) -> bool {
        matches!(self, Self::Transitioned { .. })
    }
}

struct Inner<S: State> {
    state: S,
    subscribers: Vec<mpsc::UnboundedSender<S>>,
    history: StateHistory<S>,
    sequence: u64,
    unmatched: u64,
    closed: bool,
}

/// Holds the current state and applies actions to it, one at a time.
pub struct Store<S: State> {
    inner: Mutex<Inner<S>>,
    config: StoreConfig,
}

impl<S: State> Store<S> {
    /// Create a store in the initial state with default configuration.
    pub fn new(initial: S) -> Self {
        Self::with_config(initial, StoreConfig::default())
    }

    pub fn with_config(initial: S, config: StoreConfig) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: initial,
                subscribers: Vec::new(),
                history: StateHistory::with_limit(config.history_limit),
                sequence: 0,
                unmatched: 0,
                closed: false,
            }),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Apply an action to the current state.
    ///
    /// A panic raised by a guard or transform propagates to the caller and
    /// leaves the state unchanged.
    pub fn apply(&self, action: &Action<S>) -> Result<ApplyOutcome<S>, StoreError> {
        let mut inner = self.lock();
        if inner.closed {
            return Err(StoreError::Unbound);
        }

        let Some((index, transition)) = action.select(&inner.state) else {
            return self.unmatched(&mut inner, action);
        };

        let next = transition.apply(&inner.state);
        if next.kind() != transition.to() {
            return Err(StoreError::TargetMismatch {
                action: action.name().to_string(),
                expected: transition.to(),
                actual: next.kind(),
            });
        }

        inner.sequence += 1;
        let sequence = inner.sequence;
        let previous = std::mem::replace(&mut inner.state, next.clone());
        inner.history.push(StateTransition {
            from: previous.clone(),
            to: next.clone(),
            action: action.name().to_string(),
            sequence,
            timestamp: Utc::now(),
        });
        debug!(
            action = action.name(),
            from = previous.name(),
            to = next.name(),
            sequence,
            "transition applied"
        );

        inner
            .subscribers
            .retain(|subscriber| subscriber.send(next.clone()).is_ok());

        Ok(ApplyOutcome::Transitioned {
            from: previous,
            to: next,
            action: action.name().to_string(),
            transition: index,
            sequence,
        })
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> Result<S, StoreError> {
        let inner = self.lock();
        if inner.closed {
            return Err(StoreError::Unbound);
        }
        Ok(inner.state.clone())
    }

    /// Subscribe to the current state and every state published after it.
    pub fn subscribe(&self) -> Result<StateStream<S>, StoreError> {
        let mut inner = self.lock();
        if inner.closed {
            return Err(StoreError::Unbound);
        }

        let (sender, receiver) = mpsc::unbounded_channel();
        // The receiver is alive, so this send cannot fail.
        let _ = sender.send(inner.state.clone());
        inner.subscribers.push(sender);
        trace!(subscribers = inner.subscribers.len(), "state subscriber added");

        Ok(StateStream::new(receiver))
    }

    /// Snapshot of the retained transition history.
    pub fn history(&self) -> StateHistory<S> {
        self.lock().history.clone()
    }

    /// Number of applied actions that matched no transition.
    pub fn unmatched_count(&self) -> u64 {
        self.lock().unmatched
    }

    /// Number of transitions applied so far.
    pub fn sequence(&self) -> u64 {
        self.lock().sequence
    }

    /// Stop accepting actions and end every subscriber's stream.
    ///
    /// Returns `false` if the store was already closed.
    pub fn close(&self) -> bool {
        let mut inner = self.lock();
        if inner.closed {
            return false;
        }
        inner.closed = true;
        inner.subscribers.clear();
        debug!(state = inner.state.name(), "store closed");
        true
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn unmatched(
        &self,
        inner: &mut Inner<S>,
        action: &Action<S>,
    ) -> Result<ApplyOutcome<S>, StoreError> {
        inner.unmatched += 1;
        let state = inner.state.name();

        match self.config.unmatched {
            UnmatchedPolicy::Ignore => {
                debug!(action = action.name(), state, "no matching transition");
            }
            UnmatchedPolicy::Warn => {
                warn!(action = action.name(), state, "no matching transition");
            }
            UnmatchedPolicy::Reject => {
                return Err(StoreError::NoMatchingTransition {
                    action: action.name().to_string(),
                    state: inner.state.kind(),
                });
            }
        }

        Ok(ApplyOutcome::Unmatched {
            state: inner.state.clone(),
            action: action.name().to_string(),
        })
    }

    // Guards and transforms run before anything is written, so a panic
    // while locked leaves consistent data behind.
    fn lock(&self) -> MutexGuard<'_, Inner<S>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
