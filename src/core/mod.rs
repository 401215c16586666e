//! Core state machine types.
//!
//! This module contains the pure building blocks shared by the runtime and
//! the graph analyzer:
//! - State definitions via the `State` trait and `StateKind` identifiers
//! - Guard predicates for transition control
//! - Bounded transition history

mod guard;
mod history;
mod state;

pub use guard::Guard;
pub use history::{StateHistory, StateTransition, DEFAULT_HISTORY_LIMIT};
pub use state::{State, StateKind};
