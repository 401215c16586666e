//! Stategraph: finite state machines with explicit transition graphs
//!
//! A machine is a single immutable current state, a set of actions whose
//! transitions are guarded pure functions between state variants, and an
//! optional async worker that starts and cancels background work keyed to
//! the state the machine is in. Because every transition is declared up
//! front, the same declarations can be analysed offline for reachability
//! and rendered as a Graphviz graph.
//!
//! # Core Concepts
//!
//! - **State**: an application enum implementing [`State`]; each value
//!   reports its variant as a [`StateKind`]
//! - **Action**: a named intent owning an ordered list of [`Transition`]s;
//!   the first transition whose source kind and guard match is applied
//! - **Store**: serializes actions against the current state and publishes
//!   every new state
//! - **AsyncWorker**: maps each published state to a task decision
//! - **Graph**: adjacency, reachability and DOT rendering over catalogs
//!
//! # Example
//!
//! ```rust
//! use stategraph::action::{Action, Transition};
//! use stategraph::feature::Feature;
//! use stategraph::graph::{self, ActionCatalog};
//! use stategraph::state_enum;
//!
//! state_enum! {
//!     enum Auth => auth {
//!         LoggedOut,
//!         LoggingIn { user: String },
//!         LoggedIn { user: String },
//!     }
//! }
//!
//! fn login(user: &str) -> Action<Auth> {
//!     let user = user.to_string();
//!     Action::new(
//!         "Login",
//!         vec![Transition::new(auth::LoggedOut, auth::LoggingIn, move |_| {
//!             Auth::LoggingIn { user: user.clone() }
//!         })],
//!     )
//!     .unwrap()
//! }
//!
//! let feature = Feature::new(Auth::LoggedOut);
//! let outcome = feature.proceed(&login("ada")).unwrap();
//! assert!(outcome.is_transitioned());
//!
//! let actions = ActionCatalog::new().action(&login(""));
//! let unreachable =
//!     graph::unreachable_states(&actions, &Auth::catalog(), auth::LoggedOut).unwrap();
//! assert_eq!(unreachable, vec![auth::LoggedIn]);
//! ```

pub mod action;
pub mod builder;
pub mod core;
pub mod feature;
pub mod graph;
pub mod store;
pub mod worker;

pub use action::{Action, Transition};
pub use builder::{ActionBuilder, BuildError, TransitionBuilder};
pub use core::{Guard, State, StateHistory, StateKind, StateTransition};
pub use feature::{Feature, FeatureBuilder, FeatureError};
pub use store::{ApplyOutcome, StateStream, Store, StoreConfig, StoreError, UnmatchedPolicy};
pub use worker::{
    AsyncWorker, AsyncWorkerBinding, AsyncWorkerTask, TaskContext, TaskTicket, WorkerConfig,
    WorkerError,
};
