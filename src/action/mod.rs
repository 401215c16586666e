//! Actions: named intents owning an ordered set of transitions.
//!
//! An action's payload (credentials, a confirmation flag) is captured by the
//! guards and transforms of its transitions when the action is constructed.
//! After construction the transition list never changes.
//!
//! # Example
//!
//! ```rust
//! use stategraph::action::{Action, Transition};
//! use stategraph::core::{State, StateKind};
//!
//! const REQUESTED: StateKind = StateKind::new("ConfirmationRequested");
//! const REGISTERING: StateKind = StateKind::new("Registering");
//! const REGISTRATION: StateKind = StateKind::new("Registration");
//!
//! #[derive(Clone, PartialEq, Debug)]
//! enum Signup {
//!     Registration,
//!     ConfirmationRequested,
//!     Registering,
//! }
//!
//! impl State for Signup {
//!     fn kind(&self) -> StateKind {
//!         match self {
//!             Self::Registration => REGISTRATION,
//!             Self::ConfirmationRequested => REQUESTED,
//!             Self::Registering => REGISTERING,
//!         }
//!     }
//! }
//!
//! fn handle_confirmation(confirmed: bool) -> Action<Signup> {
//!     Action::<Signup>::builder("HandleConfirmation")
//!         .transition(Transition::new(REQUESTED, REGISTERING, |_| Signup::Registering))
//!         .when(move |_| confirmed)
//!         .transition(Transition::new(REQUESTED, REGISTRATION, |_| Signup::Registration))
//!         .when(move |_| !confirmed)
//!         .build()
//!         .unwrap()
//! }
//!
//! let action = handle_confirmation(false);
//! let (index, _) = action.select(&Signup::ConfirmationRequested).unwrap();
//! assert_eq!(index, 1);
//! ```

mod transition;

pub use transition::{Transform, Transition};

use crate::builder::{ActionBuilder, BuildError};
use crate::core::State;
use std::fmt;
use std::sync::Arc;

/// Immutable command owning a fixed, ordered list of transitions.
///
/// Cloning is cheap; clones share the same transition list.
pub struct Action<S: State> {
    name: Arc<str>,
    transitions: Arc<[Transition<S>]>,
}

impl<S: State> Action<S> {
    /// Create an action from its name and transitions, in declaration order.
    pub fn new(
        name: impl Into<String>,
        transitions: Vec<Transition<S>>,
    ) -> Result<Self, BuildError> {
        let name: String = name.into();
        if name.trim().is_empty() {
            return Err(BuildError::EmptyActionName);
        }

        Ok(Self {
            name: name.into(),
            transitions: transitions.into(),
        })
    }

    /// Start a fluent builder for an action.
    pub fn builder(name: impl Into<String>) -> ActionBuilder<S> {
        ActionBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transitions(&self) -> &[Transition<S>] {
        &self.transitions
    }

    /// Find the first transition, in declaration order, whose source kind
    /// matches `current` and whose guard passes.
    pub fn select(&self, current: &S) -> Option<(usize, &Transition<S>)> {
        self.transitions
            .iter()
            .enumerate()
            .find(|(_, t)| t.can_execute(current))
    }
}

impl<S: State> Clone for Action<S> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            transitions: Arc::clone(&self.transitions),
        }
    }
}

impl<S: State> fmt::Debug for Action<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("transitions", &self.transitions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StateKind;

    const IDLE: StateKind = StateKind::new("Idle");
    const BUSY: StateKind = StateKind::new("Busy");
    const DONE: StateKind = StateKind::new("Done");

    #[derive(Clone, PartialEq, Debug)]
    enum TestState {
        Idle,
        Busy(u32),
        Done,
    }

    impl State for TestState {
        fn kind(&self) -> StateKind {
            match self {
                Self::Idle => IDLE,
                Self::Busy(_) => BUSY,
                Self::Done => DONE,
            }
        }
    }

    #[test]
    fn empty_name_is_rejected() {
        let result = Action::<TestState>::new("  ", Vec::new());
        assert!(matches!(result, Err(BuildError::EmptyActionName)));
    }

    #[test]
    fn select_skips_other_source_kinds() {
        let action = Action::new(
            "Advance",
            vec![
                Transition::new(BUSY, DONE, |_: &TestState| TestState::Done),
                Transition::new(IDLE, BUSY, |_: &TestState| TestState::Busy(1)),
            ],
        )
        .unwrap();

        let (index, transition) = action.select(&TestState::Idle).unwrap();
        assert_eq!(index, 1);
        assert_eq!(transition.to(), BUSY);
        assert!(action.select(&TestState::Done).is_none());
    }

    #[test]
    fn select_prefers_first_declared_match() {
        let action = Action::new(
            "Start",
            vec![
                Transition::new(IDLE, BUSY, |_: &TestState| TestState::Busy(1)),
                Transition::new(IDLE, DONE, |_: &TestState| TestState::Done),
            ],
        )
        .unwrap();

        let (index, _) = action.select(&TestState::Idle).unwrap();
        assert_eq!(index, 0);
    }

    #[test]
    fn clones_share_transitions() {
        let action = Action::new(
            "Start",
            vec![Transition::new(IDLE, BUSY, |_: &TestState| TestState::Busy(1))],
        )
        .unwrap();
        let cloned = action.clone();

        assert!(std::ptr::eq(action.transitions(), cloned.transitions()));
        assert_eq!(cloned.name(), "Start");
    }
}
