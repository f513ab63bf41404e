//! Typed search errors.
//!
//! `SearchError` represents pre-flight failures only. Runtime terminations
//! (frontier exhaustion, collaborator contract violations) are expressed via
//! [`crate::engine::EngineStatus`] and always leave the engine inspectable.

use iwplan_kernel::carrier::fluent::{ActionId, FluentId};

/// Typed failure for search configuration and start-up.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    /// The width bound is NaN or negative.
    InvalidBound { bound: f32 },
    /// A supplied start state was built for a different fluent count.
    StateShapeMismatch { expected: usize, actual: usize },
    /// A goal-override fluent is out of range for the model.
    UnknownFluent { fluent: FluentId, num_fluents: usize },
    /// The relaxed-plan heuristic returned an action the model does not have.
    UnknownRelaxedPlanAction { action: ActionId, num_actions: usize },
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBound { bound } => write!(f, "invalid width bound: {bound}"),
            Self::StateShapeMismatch { expected, actual } => write!(
                f,
                "start state has {actual} fluents, model has {expected}"
            ),
            Self::UnknownFluent {
                fluent,
                num_fluents,
            } => write!(f, "goal fluent {fluent} out of range (model has {num_fluents})"),
            Self::UnknownRelaxedPlanAction {
                action,
                num_actions,
            } => write!(
                f,
                "relaxed plan references action {action} (model has {num_actions})"
            ),
        }
    }
}

impl std::error::Error for SearchError {}
