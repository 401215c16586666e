//! Graph analysis error types.

use crate::core::StateKind;
use thiserror::Error;

/// A disagreement between the state catalog and the declared transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogViolation {
    #[error("State '{kind}' is registered more than once")]
    DuplicateState { kind: StateKind },

    #[error("Action '{action}' declares a transition from unknown state '{kind}'")]
    UnknownSource { action: String, kind: StateKind },

    #[error("Action '{action}' declares a transition to unknown state '{kind}'")]
    UnknownTarget { action: String, kind: StateKind },
}

/// Errors raised by the offline graph analysis.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GraphError {
    /// Every violation found in the catalogs, not only the first
    #[error("Catalog validation failed with {} violation(s)", .0.len())]
    Invalid(Vec<CatalogViolation>),

    #[error("Initial state '{kind}' is not a state of the catalog")]
    UnknownInitialState { kind: StateKind },

    #[error("Transition {from} -> {to} of action '{action}' has no edge label")]
    MissingEdgeLabel {
        action: String,
        from: StateKind,
        to: StateKind,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_reports_violation_count() {
        let error = GraphError::Invalid(vec![
            CatalogViolation::DuplicateState {
                kind: StateKind::new("A"),
            },
            CatalogViolation::UnknownTarget {
                action: "Go".to_string(),
                kind: StateKind::new("Z"),
            },
        ]);

        assert_eq!(
            error.to_string(),
            "Catalog validation failed with 2 violation(s)"
        );
    }

    #[test]
    fn missing_label_names_the_edge() {
        let error = GraphError::MissingEdgeLabel {
            action: "Go".to_string(),
            from: StateKind::new("A"),
            to: StateKind::new("B"),
        };

        assert!(error.to_string().contains("A -> B"));
    }
}
