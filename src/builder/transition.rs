//! Builder for constructing state transitions.

use crate::action::{Transform, Transition};
use crate::builder::error::BuildError;
use crate::core::{Guard, State, StateKind};
use std::sync::Arc;

/// Builder for constructing transitions with a fluent API.
pub struct TransitionBuilder<S: State> {
    from: Option<StateKind>,
    to: Option<StateKind>,
    guard: Option<Guard<S>>,
    transform: Option<Transform<S>>,
    name: Option<String>,
    label: Option<String>,
}

impl<S: State> TransitionBuilder<S> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            from: None,
            to: None,
            guard: None,
            transform: None,
            name: None,
            label: None,
        }
    }

    /// Set the source kind (required).
    pub fn from(mut self, kind: StateKind) -> Self {
        self.from = Some(kind);
        self
    }

    /// Set the target kind (required).
    pub fn to(mut self, kind: StateKind) -> Self {
        self.to = Some(kind);
        self
    }

    /// Add a guard predicate (optional).
    pub fn guard(mut self, guard: Guard<S>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Add a guard using a closure (optional).
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    /// Set the transform (required).
    pub fn transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&S) -> S + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(transform));
        self
    }

    /// Transform into a fixed value, typically a payload-free variant.
    pub fn into_target(self, target: S) -> Self {
        self.transform(move |_| target.clone())
    }

    /// Name the transition itself (optional).
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set an explicit edge label for graph output (optional).
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition<S>, BuildError> {
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let to = self.to.ok_or(BuildError::MissingToState)?;
        let transform = self.transform.ok_or(BuildError::MissingTransform)?;

        Ok(Transition {
            from,
            to,
            guard: self.guard,
            transform,
            name: self.name,
            label: self.label,
        })
    }
}

impl<S: State> Default for TransitionBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
