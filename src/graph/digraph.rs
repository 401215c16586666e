//! Edge labelling and Graphviz DOT rendering.

use super::analyzer::unreachable_states;
use super::catalog::{ActionCatalog, StateCatalog};
use super::error::GraphError;
use crate::core::StateKind;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DigraphOptions {
    /// Label unlabelled edges with their transition's own name instead of
    /// the action name.
    pub use_transition_name: bool,
}

/// A labelled `from -> to` edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from: StateKind,
    pub to: StateKind,
    pub label: String,
}

/// Every declared edge with its resolved label.
///
/// An explicit label wins. Otherwise the transition's name is used when
/// `use_transition_name` is set, and the action's name when it is not.
/// A missing or blank result is an error.
pub fn edge_list(
    actions: &ActionCatalog,
    options: DigraphOptions,
) -> Result<Vec<Edge>, GraphError> {
    actions
        .edges()
        .map(|(action, edge)| {
            let fallback = if options.use_transition_name {
                edge.name.as_deref()
            } else {
                Some(action)
            };
            let label = edge
                .label
                .as_deref()
                .or(fallback)
                .filter(|label| !label.trim().is_empty())
                .ok_or_else(|| GraphError::MissingEdgeLabel {
                    action: action.to_string(),
                    from: edge.from,
                    to: edge.to,
                })?;

            Ok(Edge {
                from: edge.from,
                to: edge.to,
                label: label.to_string(),
            })
        })
        .collect()
}

/// Render the machine as a Graphviz digraph.
///
/// The initial state is listed first, followed by every labelled edge;
/// unreachable states are coloured red.
pub fn generate_digraph(
    actions: &ActionCatalog,
    states: &StateCatalog,
    initial: StateKind,
    options: DigraphOptions,
) -> Result<String, GraphError> {
    let unreachable = unreachable_states(actions, states, initial)?;
    let edges = edge_list(actions, options)?;
    Ok(render_digraph(states, initial, &edges, &unreachable))
}

/// DOT text for already analysed parts.
pub fn render_digraph(
    states: &StateCatalog,
    initial: StateKind,
    edges: &[Edge],
    unreachable: &[StateKind],
) -> String {
    let path = |kind: StateKind| states.display_path(kind).unwrap_or(kind.name()).to_string();

    let mut dot = format!("\ndigraph {}Transitions {{\n", states.base_name());
    dot.push_str(&format!("\"{}\"\n", path(initial)));
    for edge in edges {
        // Leading space keeps the label off the arrow.
        dot.push_str(&format!(
            "\"{}\" -> \"{}\" [label=\" {}\"]\n",
            path(edge.from),
            path(edge.to),
            edge.label
        ));
    }
    for &kind in unreachable {
        dot.push_str(&format!("\"{}\" [color=\"red\"]\n", path(kind)));
    }
    dot.push_str("}\n\n");
    dot
}
