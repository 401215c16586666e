//! Offline analysis of the declared state graph.
//!
//! Nothing here runs the machine. States are registered in a
//! [`StateCatalog`], actions in an [`ActionCatalog`], and the functions in
//! this module derive the implied graph from them: adjacency, reachability
//! from an initial state, terminal states and a Graphviz rendering.
//!
//! # Example
//!
//! ```rust
//! use stategraph::core::StateKind;
//! use stategraph::graph::{self, ActionCatalog, DigraphOptions, EdgeDecl, StateCatalog};
//!
//! const OUT: StateKind = StateKind::new("LoggedOut");
//! const IN: StateKind = StateKind::new("LoggedIn");
//!
//! let states = StateCatalog::new("Auth").state(OUT).state(IN);
//! let actions = ActionCatalog::new()
//!     .declare("Login", vec![EdgeDecl::new(OUT, IN)])
//!     .declare("Logout", vec![EdgeDecl::new(IN, OUT)]);
//!
//! assert!(graph::unreachable_states(&actions, &states, OUT).unwrap().is_empty());
//! assert!(graph::final_states(&actions, &states).unwrap().is_empty());
//!
//! let dot = graph::generate_digraph(&actions, &states, OUT, DigraphOptions::default()).unwrap();
//! assert!(dot.contains("\"LoggedOut\" -> \"LoggedIn\" [label=\" Login\"]"));
//! ```

mod analyzer;
mod catalog;
mod digraph;
mod error;

pub use analyzer::{
    build_adjacency, final_states, reachable_from, terminal_states, unreachable_states, Adjacency,
};
pub use catalog::{ActionCatalog, ActionDecl, EdgeDecl, StateCatalog};
pub use digraph::{edge_list, generate_digraph, render_digraph, DigraphOptions, Edge};
pub use error::{CatalogViolation, GraphError};
