//! Build errors for action and transition builders.

use thiserror::Error;

/// Errors that can occur when building actions and transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Action name is empty. Every action needs a name to label its edges")]
    EmptyActionName,

    #[error("Transition source state not specified. Call .from(kind)")]
    MissingFromState,

    #[error("Transition target state not specified. Call .to(kind)")]
    MissingToState,

    #[error("Transition transform not specified. Call .transform(f) or .into_target(value)")]
    MissingTransform,

    #[error("`{modifier}` called before any transition was added to action '{action}'")]
    DanglingModifier {
        action: String,
        modifier: &'static str,
    },
}
