//! `replay_plan()`: verify a plan by deterministic replay.

use crate::carrier::fluent::{ActionId, Cost};
use crate::carrier::state::State;
use crate::operators::model::PlanningModel;

/// Why a plan could not be replayed to a goal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// A step references an action the model does not have.
    UnknownAction { step: usize, action: ActionId },
    /// A step's precondition does not hold in the state reached so far.
    InapplicableAction { step: usize, action: ActionId },
    /// Every step applied, but the final state is not a goal state.
    GoalNotReached { steps: usize },
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownAction { step, action } => {
                write!(f, "step {step}: unknown action {action}")
            }
            Self::InapplicableAction { step, action } => {
                write!(f, "step {step}: action {action} is not applicable")
            }
            Self::GoalNotReached { steps } => {
                write!(f, "goal not reached after {steps} steps")
            }
        }
    }
}

impl std::error::Error for ReplayError {}

/// Outcome of a successful replay.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayVerdict {
    /// The goal state the plan ends in.
    pub final_state: State,
    /// Sum of `transition_cost` over every step.
    pub total_cost: Cost,
}

/// Apply `plan` from `start`, checking applicability at every step and the
/// goal at the end.
///
/// # Errors
///
/// Returns the first [`ReplayError`] encountered.
pub fn replay_plan<M: PlanningModel + ?Sized>(
    model: &M,
    start: &State,
    plan: &[ActionId],
) -> Result<ReplayVerdict, ReplayError> {
    let mut state = start.clone();
    let mut total_cost: Cost = 0.0;
    for (step, &action) in plan.iter().enumerate() {
        if action.index() >= model.num_actions() {
            return Err(ReplayError::UnknownAction { step, action });
        }
        if !model.is_applicable(&state, action) {
            return Err(ReplayError::InapplicableAction { step, action });
        }
        total_cost += model.transition_cost(&state, action);
        state = model.next_state(&state, action);
    }
    if !model.is_goal(&state) {
        return Err(ReplayError::GoalNotReached { steps: plan.len() });
    }
    Ok(ReplayVerdict {
        final_state: state,
        total_cost,
    })
}
