//! Core State trait for state machine states.
//!
//! A machine's state is a single immutable value. Applications model it as
//! an enum; every value reports which concrete variant it is through a
//! [`StateKind`], which is what transitions, the async worker and the graph
//! analyzer reason about.

use serde::Serialize;
use std::fmt::{self, Debug, Display};

/// Identifier of one concrete state variant.
///
/// Kinds are compared by name, so two variants of the same state type must
/// never share a name.
///
/// # Example
///
/// ```rust
/// use stategraph::core::StateKind;
///
/// const IDLE: StateKind = StateKind::new("Idle");
///
/// assert_eq!(IDLE.name(), "Idle");
/// assert_eq!(IDLE.to_string(), "Idle");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StateKind(&'static str);

impl StateKind {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl Debug for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Trait for state machine states.
///
/// All methods are pure - no side effects. States represent immutable
/// values that describe the current position in a state machine.
///
/// # Required Traits
///
/// - `Clone`: the store hands out snapshots and records history
/// - `PartialEq`: states double as launch keys for the async worker
/// - `Debug`: states show up in diagnostics and errors
/// - `Send` + `Sync` + `'static`: states cross task boundaries
///
/// # Example
///
/// ```rust
/// use stategraph::core::{State, StateKind};
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum AuthState {
///     LoggedOut,
///     LoggingIn { user: String },
///     LoggedIn { user: String },
/// }
///
/// impl State for AuthState {
///     fn kind(&self) -> StateKind {
///         match self {
///             Self::LoggedOut => StateKind::new("LoggedOut"),
///             Self::LoggingIn { .. } => StateKind::new("LoggingIn"),
///             Self::LoggedIn { .. } => StateKind::new("LoggedIn"),
///         }
///     }
/// }
///
/// let state = AuthState::LoggingIn { user: "ada".into() };
/// assert_eq!(state.name(), "LoggingIn");
/// assert!(state.is(StateKind::new("LoggingIn")));
/// ```
pub trait State: Clone + PartialEq + Debug + Send + Sync + 'static {
    /// The concrete variant this value belongs to.
    fn kind(&self) -> StateKind;

    /// Get the state's name for display/logging.
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Check whether this value is of the given variant.
    fn is(&self, kind: StateKind) -> bool {
        self.kind() == kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug)]
    enum TestState {
        Initial,
        Processing { job: u32 },
        Complete,
    }

    impl State for TestState {
        fn kind(&self) -> StateKind {
            match self {
                Self::Initial => StateKind::new("Initial"),
                Self::Processing { .. } => StateKind::new("Processing"),
                Self::Complete => StateKind::new("Complete"),
            }
        }
    }

    #[test]
    fn state_name_returns_variant_name() {
        assert_eq!(TestState::Initial.name(), "Initial");
        assert_eq!(TestState::Processing { job: 7 }.name(), "Processing");
        assert_eq!(TestState::Complete.name(), "Complete");
    }

    #[test]
    fn kind_ignores_payload() {
        let a = TestState::Processing { job: 1 };
        let b = TestState::Processing { job: 2 };

        assert_ne!(a, b);
        assert_eq!(a.kind(), b.kind());
    }

    #[test]
    fn is_checks_variant() {
        let state = TestState::Processing { job: 3 };
        assert!(state.is(StateKind::new("Processing")));
        assert!(!state.is(StateKind::new("Initial")));
    }

    #[test]
    fn kinds_order_by_name() {
        let mut kinds = vec![
            StateKind::new("Complete"),
            StateKind::new("Initial"),
            StateKind::new("Processing"),
        ];
        kinds.sort();
        assert_eq!(kinds[0].name(), "Complete");
        assert_eq!(kinds[2].name(), "Processing");
    }

    #[test]
    fn kind_serializes_as_plain_string() {
        let json = serde_json::to_string(&StateKind::new("Initial")).unwrap();
        assert_eq!(json, "\"Initial\"");
    }
}
