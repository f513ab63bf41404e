//! The planning-model contract consumed by the search.

use crate::carrier::fluent::{ActionId, Cost, FluentId};
use crate::carrier::state::State;
use crate::operators::action::{Action, LazyUndo};
use crate::operators::task::StripsTask;

/// Successor generation, goal testing and action metadata for a search.
///
/// # Contract
///
/// - `applicable_actions` must be deterministic: same state → same ids in
///   the same order.
/// - Every id it returns must satisfy `is_applicable` on that state.
/// - `next_state` is pure: it never mutates its input.
/// - `progress` followed by `regress` with the returned undo record restores
///   the state exactly.
pub trait PlanningModel {
    fn num_fluents(&self) -> usize;

    fn num_actions(&self) -> usize;

    /// Action metadata (add lists and conditional effects).
    ///
    /// # Panics
    ///
    /// May panic if `action` is out of range; callers validate ids first.
    fn action(&self, action: ActionId) -> &Action;

    fn initial_state(&self) -> State;

    fn goal_fluents(&self) -> &[FluentId];

    fn is_goal(&self, state: &State) -> bool {
        state.entails_all(self.goal_fluents())
    }

    fn is_applicable(&self, state: &State, action: ActionId) -> bool {
        action.index() < self.num_actions() && self.action(action).is_applicable(state)
    }

    fn applicable_actions(&self, state: &State) -> Vec<ActionId>;

    fn next_state(&self, state: &State, action: ActionId) -> State {
        self.action(action).successor(state)
    }

    fn transition_cost(&self, state: &State, action: ActionId) -> Cost;

    /// Apply `action` to `state` in place for an ephemeral check.
    fn progress(&self, state: &mut State, action: ActionId) -> LazyUndo {
        self.action(action).progress(state)
    }

    /// Undo a previous [`PlanningModel::progress`].
    fn regress(&self, state: &mut State, action: ActionId, undo: LazyUndo) {
        self.action(action).regress(state, undo);
    }
}

impl PlanningModel for StripsTask {
    fn num_fluents(&self) -> usize {
        self.fluent_names().len()
    }

    fn num_actions(&self) -> usize {
        self.actions().len()
    }

    fn action(&self, action: ActionId) -> &Action {
        &self.actions()[action.index()]
    }

    fn initial_state(&self) -> State {
        self.init_state()
    }

    fn goal_fluents(&self) -> &[FluentId] {
        self.goal()
    }

    fn applicable_actions(&self, state: &State) -> Vec<ActionId> {
        self.actions()
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_applicable(state))
            .filter_map(|(i, _)| ActionId::from_index(i))
            .collect()
    }

    fn transition_cost(&self, _state: &State, action: ActionId) -> Cost {
        self.action(action).cost()
    }
}
