//! State transition history tracking.
//!
//! The store keeps a bounded, ordered record of every transition it has
//! applied. Records are immutable values; the history only grows at the
//! end and forgets its oldest entries once the configured limit is hit.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Number of transitions a store retains unless configured otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 64;

/// Record of a single applied transition.
///
/// # Example
///
/// ```rust
/// use stategraph::core::{State, StateKind, StateTransition};
/// use chrono::Utc;
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum Door { Open, Closed }
///
/// impl State for Door {
///     fn kind(&self) -> StateKind {
///         match self {
///             Self::Open => StateKind::new("Open"),
///             Self::Closed => StateKind::new("Closed"),
///         }
///     }
/// }
///
/// let transition = StateTransition {
///     from: Door::Open,
///     to: Door::Closed,
///     action: "Close".to_string(),
///     sequence: 1,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(transition.action, "Close");
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateTransition<S: State> {
    /// The state being transitioned from
    pub from: S,
    /// The state being transitioned to
    pub to: S,
    /// Name of the action that selected the transition
    pub action: String,
    /// Position of this transition in the store's total order, starting at 1
    pub sequence: u64,
    /// When the transition was applied
    pub timestamp: DateTime<Utc>,
}

/// Ordered, bounded history of applied transitions.
///
/// # Example
///
/// ```rust
/// use stategraph::core::{State, StateHistory, StateKind, StateTransition};
/// use chrono::Utc;
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum Phase { One, Two, Three }
///
/// impl State for Phase {
///     fn kind(&self) -> StateKind {
///         match self {
///             Self::One => StateKind::new("One"),
///             Self::Two => StateKind::new("Two"),
///             Self::Three => StateKind::new("Three"),
///         }
///     }
/// }
///
/// let mut history = StateHistory::with_limit(8);
/// history.push(StateTransition {
///     from: Phase::One,
///     to: Phase::Two,
///     action: "Next".into(),
///     sequence: 1,
///     timestamp: Utc::now(),
/// });
/// history.push(StateTransition {
///     from: Phase::Two,
///     to: Phase::Three,
///     action: "Next".into(),
///     sequence: 2,
///     timestamp: Utc::now(),
/// });
///
/// let path = history.get_path();
/// assert_eq!(path, vec![&Phase::One, &Phase::Two, &Phase::Three]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(
    serialize = "S: Serialize",
    deserialize = "S: serde::de::DeserializeOwned"
))]
pub struct StateHistory<S: State> {
    transitions: VecDeque<StateTransition<S>>,
    limit: usize,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl<S: State> StateHistory<S> {
    /// Create an empty history keeping at most `limit` transitions.
    ///
    /// A limit of zero disables recording.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            transitions: VecDeque::with_capacity(limit.min(DEFAULT_HISTORY_LIMIT)),
            limit,
        }
    }

    /// Append a transition, evicting the oldest one when full.
    pub fn push(&mut self, transition: StateTransition<S>) {
        if self.limit == 0 {
            return;
        }
        if self.transitions.len() == self.limit {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// Get the path of states traversed.
    ///
    /// Returns the `from` state of the oldest retained transition, then the
    /// `to` state of each transition.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Time elapsed between the oldest and newest retained transition.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.front()?, self.transitions.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Iterate retained transitions, oldest first.
    pub fn transitions(&self) -> impl Iterator<Item = &StateTransition<S>> {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StateKind;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        Initial,
        Processing,
        Complete,
    }

    impl State for TestState {
        fn kind(&self) -> StateKind {
            match self {
                Self::Initial => StateKind::new("Initial"),
                Self::Processing => StateKind::new("Processing"),
                Self::Complete => StateKind::new("Complete"),
            }
        }
    }

    fn record(from: TestState, to: TestState, sequence: u64) -> StateTransition<TestState> {
        StateTransition {
            from,
            to,
            action: "Step".to_string(),
            sequence,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: StateHistory<TestState> = StateHistory::default();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
        assert_eq!(history.limit(), DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn get_path_returns_state_sequence() {
        let mut history = StateHistory::default();
        history.push(record(TestState::Initial, TestState::Processing, 1));
        history.push(record(TestState::Processing, TestState::Complete, 2));

        let path = history.get_path();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], &TestState::Initial);
        assert_eq!(path[1], &TestState::Processing);
        assert_eq!(path[2], &TestState::Complete);
    }

    #[test]
    fn push_evicts_oldest_when_full() {
        let mut history = StateHistory::with_limit(2);
        history.push(record(TestState::Initial, TestState::Processing, 1));
        history.push(record(TestState::Processing, TestState::Complete, 2));
        history.push(record(TestState::Complete, TestState::Initial, 3));

        let sequences: Vec<u64> = history.transitions().map(|t| t.sequence).collect();
        assert_eq!(sequences, vec![2, 3]);
    }

    #[test]
    fn zero_limit_disables_recording() {
        let mut history = StateHistory::with_limit(0);
        history.push(record(TestState::Initial, TestState::Processing, 1));
        assert!(history.is_empty());
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let mut history = StateHistory::default();
        history.push(record(TestState::Initial, TestState::Processing, 1));

        std::thread::sleep(std::time::Duration::from_millis(10));

        history.push(record(TestState::Processing, TestState::Complete, 2));

        let duration = history.duration().unwrap();
        assert!(duration >= std::time::Duration::from_millis(10));
    }

    #[test]
    fn history_serializes_correctly() {
        let mut history = StateHistory::default();
        history.push(record(TestState::Initial, TestState::Processing, 1));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: StateHistory<TestState> = serde_json::from_str(&json).unwrap();

        assert_eq!(history.len(), deserialized.len());
        assert_eq!(deserialized.get_path()[1], &TestState::Processing);
    }
}
