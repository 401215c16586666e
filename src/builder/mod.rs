//! Builder API for ergonomic action and transition construction.
//!
//! This module provides fluent builders and macros for declaring states,
//! transitions and actions with minimal boilerplate.

pub mod action;
pub mod error;
pub mod macros;
pub mod transition;

pub use action::ActionBuilder;
pub use error::BuildError;
pub use transition::TransitionBuilder;

use crate::action::Transition;
use crate::core::{Guard, State, StateKind};

/// Create an unconditional transition into a fixed target value.
///
/// The target kind is taken from the value itself.
///
/// # Example
///
/// ```
/// use stategraph::builder::simple_transition;
/// use stategraph::state_enum;
///
/// state_enum! {
///     enum Door => door {
///         Open,
///         Closed,
///     }
/// }
///
/// let transition = simple_transition(door::Open, Door::Closed);
/// assert_eq!(transition.to(), door::Closed);
/// ```
pub fn simple_transition<S: State>(from: StateKind, target: S) -> Transition<S> {
    let to = target.kind();
    Transition::new(from, to, move |_| target.clone())
}

/// Create a guarded transition into a fixed target value.
///
/// # Example
///
/// ```
/// use stategraph::builder::guarded_transition;
/// use stategraph::state_enum;
///
/// state_enum! {
///     enum Lock => lock {
///         Locked { attempts: u8 },
///         Unlocked,
///     }
/// }
///
/// let transition = guarded_transition(lock::Locked, Lock::Unlocked, |s| {
///     matches!(s, Lock::Locked { attempts } if *attempts < 3)
/// });
/// assert!(transition.can_execute(&Lock::Locked { attempts: 1 }));
/// assert!(!transition.can_execute(&Lock::Locked { attempts: 3 }));
/// ```
pub fn guarded_transition<S, F>(from: StateKind, target: S, guard: F) -> Transition<S>
where
    S: State,
    F: Fn(&S) -> bool + Send + Sync + 'static,
{
    let mut transition = simple_transition(from, target);
    transition.guard = Some(Guard::new(guard));
    transition
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: StateKind = StateKind::new("Start");
    const MIDDLE: StateKind = StateKind::new("Middle");
    const END: StateKind = StateKind::new("End");

    #[derive(Clone, PartialEq, Debug)]
    enum TestState {
        Start,
        Middle,
        End,
    }

    impl State for TestState {
        fn kind(&self) -> StateKind {
            match self {
                Self::Start => START,
                Self::Middle => MIDDLE,
                Self::End => END,
            }
        }
    }

    #[test]
    fn simple_transition_builds() {
        let transition = simple_transition(START, TestState::Middle);

        assert_eq!(transition.from(), START);
        assert_eq!(transition.to(), MIDDLE);
        assert!(transition.can_execute(&TestState::Start));
        assert_eq!(transition.apply(&TestState::Start), TestState::Middle);
    }

    #[test]
    fn guarded_transition_respects_guard() {
        let transition = guarded_transition(END, TestState::Start, |_| false);

        assert!(!transition.can_execute(&TestState::End));
    }
}
