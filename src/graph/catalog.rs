//! Explicit registries of the states and actions of one machine.

use crate::action::Action;
use crate::core::{State, StateKind};

#[derive(Debug, Clone, PartialEq, Eq)]
struct CatalogLeaf {
    kind: StateKind,
    path: String,
}

/// Tree of state families rooted at a base name.
///
/// Leaves are states. Groups are not states; they only qualify the display
/// path of the leaves they contain.
///
/// ```
/// use stategraph::core::StateKind;
/// use stategraph::graph::StateCatalog;
///
/// let catalog = StateCatalog::new("Auth")
///     .state(StateKind::new("LoggedOut"))
///     .group("Session", |g| g.state(StateKind::new("Active")));
///
/// assert_eq!(catalog.display_path(StateKind::new("Active")), Some("Session.Active"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateCatalog {
    base: String,
    leaves: Vec<CatalogLeaf>,
}

impl StateCatalog {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            leaves: Vec::new(),
        }
    }

    /// Register a leaf state.
    pub fn state(mut self, kind: StateKind) -> Self {
        self.leaves.push(CatalogLeaf {
            kind,
            path: kind.name().to_string(),
        });
        self
    }

    /// Register a grouping node and the states nested under it.
    pub fn group<F>(mut self, name: impl Into<String>, build: F) -> Self
    where
        F: FnOnce(StateCatalog) -> StateCatalog,
    {
        let name = name.into();
        let group = build(StateCatalog::new(name.clone()));
        self.leaves
            .extend(group.leaves.into_iter().map(|leaf| CatalogLeaf {
                kind: leaf.kind,
                path: format!("{name}.{}", leaf.path),
            }));
        self
    }

    pub fn base_name(&self) -> &str {
        &self.base
    }

    /// Every leaf state, in declaration order.
    pub fn leaves(&self) -> Vec<StateKind> {
        self.leaves.iter().map(|leaf| leaf.kind).collect()
    }

    pub fn contains(&self, kind: StateKind) -> bool {
        self.leaves.iter().any(|leaf| leaf.kind == kind)
    }

    /// Path of a leaf below the base, e.g. `Group.Leaf`.
    pub fn display_path(&self, kind: StateKind) -> Option<&str> {
        self.leaves
            .iter()
            .find(|leaf| leaf.kind == kind)
            .map(|leaf| leaf.path.as_str())
    }

    /// Kinds registered more than once, reported once each.
    pub(crate) fn duplicates(&self) -> Vec<StateKind> {
        let mut duplicates = Vec::new();
        for (index, leaf) in self.leaves.iter().enumerate() {
            let repeated = self.leaves[..index].iter().any(|l| l.kind == leaf.kind);
            if repeated && !duplicates.contains(&leaf.kind) {
                duplicates.push(leaf.kind);
            }
        }
        duplicates
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }
}

/// A declared `from -> to` edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeDecl {
    pub from: StateKind,
    pub to: StateKind,
    pub name: Option<String>,
    pub label: Option<String>,
}

impl EdgeDecl {
    pub fn new(from: StateKind, to: StateKind) -> Self {
        Self {
            from,
            to,
            name: None,
            label: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Name and edges of one registered action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDecl {
    name: String,
    edges: Vec<EdgeDecl>,
}

impl ActionDecl {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn edges(&self) -> &[EdgeDecl] {
        &self.edges
    }
}

/// Every action of a machine, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionCatalog {
    actions: Vec<ActionDecl>,
}

impl ActionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the edges declared by an action instance. Payload captured
    /// by its transitions is irrelevant here.
    pub fn action<S: State>(self, action: &Action<S>) -> Self {
        let edges = action
            .transitions()
            .iter()
            .map(|t| EdgeDecl {
                from: t.from(),
                to: t.to(),
                name: t.name().map(str::to_string),
                label: t.label().map(str::to_string),
            })
            .collect();
        self.declare(action.name(), edges)
    }

    /// Register edges by hand.
    pub fn declare(mut self, name: impl Into<String>, edges: Vec<EdgeDecl>) -> Self {
        self.actions.push(ActionDecl {
            name: name.into(),
            edges,
        });
        self
    }

    pub fn actions(&self) -> &[ActionDecl] {
        &self.actions
    }

    /// Every declared edge with the name of its action.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &EdgeDecl)> + '_ {
        self.actions
            .iter()
            .flat_map(|action| action.edges.iter().map(move |e| (action.name(), e)))
    }
}
