//! Adjacency, reachability and terminal-state analysis.

use super::catalog::{ActionCatalog, StateCatalog};
use super::error::{CatalogViolation, GraphError};
use crate::core::StateKind;
use serde::ser::{Serialize, Serializer};
use std::collections::{HashSet, VecDeque};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<CatalogViolation>>;

/// Ordered mapping from each leaf state to its declared destinations.
///
/// Keys follow catalog declaration order; destinations follow action
/// registration order and may repeat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjacency {
    entries: Vec<(StateKind, Vec<StateKind>)>,
}

impl Adjacency {
    pub fn states(&self) -> impl Iterator<Item = StateKind> + '_ {
        self.entries.iter().map(|(kind, _)| *kind)
    }

    /// Destinations of `kind`, or `None` when it is not a catalog leaf.
    pub fn successors(&self, kind: StateKind) -> Option<&[StateKind]> {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, to)| to.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateKind, &[StateKind])> + '_ {
        self.entries.iter().map(|(k, to)| (*k, to.as_slice()))
    }

    pub fn contains(&self, kind: StateKind) -> bool {
        self.successors(kind).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pretty-printed JSON object of `state -> [destinations]`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for Adjacency {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.collect_map(self.entries.iter().map(|(k, to)| (k, to)))
    }
}

/// Build the adjacency map implied by the declared transitions.
///
/// Every leaf starts with an empty destination list. All catalog problems
/// are reported together as [`GraphError::Invalid`].
pub fn build_adjacency(
    actions: &ActionCatalog,
    states: &StateCatalog,
) -> Result<Adjacency, GraphError> {
    validate(actions, states)?;

    let mut entries: Vec<(StateKind, Vec<StateKind>)> = states
        .leaves()
        .into_iter()
        .map(|kind| (kind, Vec::new()))
        .collect();

    for (_, edge) in actions.edges() {
        if let Some((_, to)) = entries.iter_mut().find(|(k, _)| *k == edge.from) {
            to.push(edge.to);
        }
    }

    Ok(Adjacency { entries })
}

fn validate(actions: &ActionCatalog, states: &StateCatalog) -> Result<(), GraphError> {
    let mut checks: Vec<Check> = states
        .duplicates()
        .into_iter()
        .map(|kind| Validation::fail(CatalogViolation::DuplicateState { kind }))
        .collect();

    for (action, edge) in actions.edges() {
        checks.push(if states.contains(edge.from) {
            Validation::success(())
        } else {
            Validation::fail(CatalogViolation::UnknownSource {
                action: action.to_string(),
                kind: edge.from,
            })
        });
        checks.push(if states.contains(edge.to) {
            Validation::success(())
        } else {
            Validation::fail(CatalogViolation::UnknownTarget {
                action: action.to_string(),
                kind: edge.to,
            })
        });
    }

    match Validation::all_vec(checks) {
        Validation::Success(_) => Ok(()),
        Validation::Failure(errors) => Err(GraphError::Invalid(errors.iter().cloned().collect())),
    }
}

/// States reachable from `initial`, in breadth-first order starting with
/// `initial` itself. Empty when `initial` is not in the map.
pub fn reachable_from(adjacency: &Adjacency, initial: StateKind) -> Vec<StateKind> {
    if !adjacency.contains(initial) {
        return Vec::new();
    }

    let mut visited = HashSet::from([initial]);
    let mut order = vec![initial];
    let mut queue = VecDeque::from([initial]);

    while let Some(node) = queue.pop_front() {
        for &next in adjacency.successors(node).unwrap_or_default() {
            if visited.insert(next) {
                order.push(next);
                queue.push_back(next);
            }
        }
    }

    order
}

/// Leaves that cannot be reached from `initial`, in declaration order.
/// Empty exactly when every leaf is reachable.
pub fn unreachable_states(
    actions: &ActionCatalog,
    states: &StateCatalog,
    initial: StateKind,
) -> Result<Vec<StateKind>, GraphError> {
    if !states.contains(initial) {
        return Err(GraphError::UnknownInitialState { kind: initial });
    }

    let adjacency = build_adjacency(actions, states)?;
    let reachable: HashSet<StateKind> = reachable_from(&adjacency, initial).into_iter().collect();

    Ok(adjacency
        .states()
        .filter(|kind| !reachable.contains(kind))
        .collect())
}

/// Leaves without any outgoing edge.
pub fn terminal_states(adjacency: &Adjacency) -> Vec<StateKind> {
    adjacency
        .iter()
        .filter(|(_, to)| to.is_empty())
        .map(|(kind, _)| kind)
        .collect()
}

/// Terminal states of the machine declared by the two catalogs.
pub fn final_states(
    actions: &ActionCatalog,
    states: &StateCatalog,
) -> Result<Vec<StateKind>, GraphError> {
    Ok(terminal_states(&build_adjacency(actions, states)?))
}
