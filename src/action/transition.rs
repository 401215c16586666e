//! Guarded, pure edges between state variants.

use crate::core::{Guard, State, StateKind};
use std::fmt;
use std::sync::Arc;

/// Pure function producing the destination state from the source state.
pub type Transform<S> = Arc<dyn Fn(&S) -> S + Send + Sync>;

/// A directed edge from one state variant to another.
///
/// The guard and transform are only invoked on values whose kind equals
/// [`Transition::from`]. The transform must be total and free of side
/// effects; background work belongs to the async worker.
pub struct Transition<S: State> {
    pub(crate) from: StateKind,
    pub(crate) to: StateKind,
    pub(crate) guard: Option<Guard<S>>,
    pub(crate) transform: Transform<S>,
    pub(crate) name: Option<String>,
    pub(crate) label: Option<String>,
}

impl<S: State> Transition<S> {
    /// Unguarded transition.
    pub fn new<F>(from: StateKind, to: StateKind, transform: F) -> Self
    where
        F: Fn(&S) -> S + Send + Sync + 'static,
    {
        Self {
            from,
            to,
            guard: None,
            transform: Arc::new(transform),
            name: None,
            label: None,
        }
    }

    /// Self-loop that keeps the current value unchanged.
    pub fn identity(kind: StateKind) -> Self {
        Self::new(kind, kind, S::clone)
    }

    pub fn from(&self) -> StateKind {
        self.from
    }

    pub fn to(&self) -> StateKind {
        self.to
    }

    /// The transition's own name, if one was given.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Explicit edge label used by the graph analyzer.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Check if this transition can execute from the current state (pure).
    pub fn can_execute(&self, current: &S) -> bool {
        if current.kind() != self.from {
            return false;
        }

        self.guard.as_ref().is_none_or(|g| g.check(current))
    }

    /// Run the transform. Callers must have checked [`Self::can_execute`].
    pub(crate) fn apply(&self, current: &S) -> S {
        (self.transform)(current)
    }
}

impl<S: State> Clone for Transition<S> {
    fn clone(&self) -> Self {
        Self {
            from: self.from,
            to: self.to,
            guard: self.guard.clone(),
            transform: Arc::clone(&self.transform),
            name: self.name.clone(),
            label: self.label.clone(),
        }
    }
}

impl<S: State> fmt::Debug for Transition<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("guarded", &self.guard.is_some())
            .field("name", &self.name)
            .field("label", &self.label)
            .finish()
    }
}
