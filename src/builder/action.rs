//! Builder for constructing actions.

use crate::action::{Action, Transition};
use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::core::{Guard, State};

/// Builder for constructing actions with a fluent API.
///
/// `when`, `named` and `labeled` modify the most recently added transition.
pub struct ActionBuilder<S: State> {
    name: String,
    transitions: Vec<Transition<S>>,
    error: Option<BuildError>,
}

impl<S: State> ActionBuilder<S> {
    /// Create a new builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transitions: Vec::new(),
            error: None,
        }
    }

    /// Append a pre-built transition.
    pub fn transition(mut self, transition: Transition<S>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Append a transition using a builder.
    /// Returns an error if the builder fails validation.
    pub fn with(mut self, builder: TransitionBuilder<S>) -> Result<Self, BuildError> {
        let transition = builder.build()?;
        self.transitions.push(transition);
        Ok(self)
    }

    /// Append multiple transitions at once, keeping their order.
    pub fn transitions(mut self, transitions: Vec<Transition<S>>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Guard the last added transition.
    pub fn when<F>(self, predicate: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        self.modify_last("when", |t| t.guard = Some(Guard::new(predicate)))
    }

    /// Name the last added transition.
    pub fn named(self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.modify_last("named", |t| t.name = Some(name))
    }

    /// Give the last added transition an explicit edge label.
    pub fn labeled(self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.modify_last("labeled", |t| t.label = Some(label))
    }

    /// Build the action.
    /// Returns the first error recorded while building.
    pub fn build(self) -> Result<Action<S>, BuildError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Action::new(self.name, self.transitions)
    }

    fn modify_last(
        mut self,
        modifier: &'static str,
        apply: impl FnOnce(&mut Transition<S>),
    ) -> Self {
        match self.transitions.last_mut() {
            Some(last) => apply(last),
            None if self.error.is_none() => {
                self.error = Some(BuildError::DanglingModifier {
                    action: self.name.clone(),
                    modifier,
                });
            }
            None => {}
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StateKind;

    const OFF: StateKind = StateKind::new("Off");
    const ON: StateKind = StateKind::new("On");

    #[derive(Clone, PartialEq, Debug)]
    enum Switch {
        Off,
        On,
    }

    impl State for Switch {
        fn kind(&self) -> StateKind {
            match self {
                Self::Off => OFF,
                Self::On => ON,
            }
        }
    }

    #[test]
    fn builder_keeps_declaration_order() {
        let action = ActionBuilder::new("Toggle")
            .transition(Transition::new(OFF, ON, |_: &Switch| Switch::On))
            .transition(Transition::new(ON, OFF, |_: &Switch| Switch::Off))
            .build()
            .unwrap();

        let kinds: Vec<_> = action.transitions().iter().map(|t| t.from()).collect();
        assert_eq!(kinds, vec![OFF, ON]);
    }

    #[test]
    fn modifiers_apply_to_last_transition() {
        let action = ActionBuilder::new("TurnOn")
            .transition(Transition::new(OFF, ON, |_: &Switch| Switch::On))
            .when(|_| false)
            .named("OffToOn")
            .labeled("power")
            .build()
            .unwrap();

        let transition = &action.transitions()[0];
        assert!(!transition.can_execute(&Switch::Off));
        assert_eq!(transition.name(), Some("OffToOn"));
        assert_eq!(transition.label(), Some("power"));
    }

    #[test]
    fn modifier_without_transition_fails() {
        let result = ActionBuilder::<Switch>::new("Broken").when(|_| true).build();

        assert!(matches!(
            result,
            Err(BuildError::DanglingModifier {
                modifier: "when",
                ..
            })
        ));
    }

    #[test]
    fn with_propagates_builder_errors() {
        let result =
            ActionBuilder::<Switch>::new("Broken").with(TransitionBuilder::new().from(OFF));

        assert!(matches!(result, Err(BuildError::MissingToState)));
    }

    #[test]
    fn empty_name_fails_on_build() {
        let result = ActionBuilder::new("")
            .transition(Transition::new(OFF, ON, |_: &Switch| Switch::On))
            .build();

        assert!(matches!(result, Err(BuildError::EmptyActionName)));
    }
}
