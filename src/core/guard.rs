//! Guard predicates for controlling state transitions.
//!
//! Guards are pure boolean functions that decide whether a transition may
//! be taken from a particular state value. Action payloads (a confirmation
//! flag, a retry budget) are captured by the closure.

use super::state::State;
use std::fmt;
use std::sync::Arc;

/// Pure predicate that determines if a transition can execute.
///
/// Guards are only ever evaluated on a state that already has the
/// transition's source kind, so a guard may assume the variant.
///
/// # Example
///
/// ```rust
/// use stategraph::core::{Guard, State, StateKind};
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum Confirmation {
///     Requested { attempts: u32 },
/// }
///
/// impl State for Confirmation {
///     fn kind(&self) -> StateKind {
///         StateKind::new("Requested")
///     }
/// }
///
/// let confirmed = true;
/// let guard = Guard::new(move |s: &Confirmation| {
///     let Confirmation::Requested { attempts } = s;
///     confirmed && *attempts < 3
/// });
///
/// assert!(guard.check(&Confirmation::Requested { attempts: 1 }));
/// assert!(!guard.check(&Confirmation::Requested { attempts: 5 }));
/// ```
pub struct Guard<S: State> {
    predicate: Arc<dyn Fn(&S) -> bool + Send + Sync>,
}

impl<S: State> Guard<S> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be pure (deterministic, no side effects) and
    /// thread-safe (Send + Sync).
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Check if the guard allows transition from this state.
    pub fn check(&self, state: &S) -> bool {
        (self.predicate)(state)
    }
}

impl<S: State> Clone for Guard<S> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<S: State> fmt::Debug for Guard<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}
