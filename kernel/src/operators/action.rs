//! Grounded actions with conditional effects.
//!
//! # Effect semantics
//!
//! Conditional effects are evaluated against the state *before* the action is
//! applied. All deletes (unconditional and fired conditional) are applied
//! before all adds, so a fluent that is both deleted and added ends up true.

use crate::carrier::fluent::{Cost, FluentId};
use crate::carrier::state::State;

/// An effect that fires only when its condition holds in the pre-state.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalEffect {
    pub condition: Vec<FluentId>,
    pub add: Vec<FluentId>,
    pub delete: Vec<FluentId>,
}

/// A grounded action.
///
/// Fluent lists are sorted and deduplicated by [`crate::operators::task::TaskBuilder`].
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub(crate) name: String,
    pub(crate) precondition: Vec<FluentId>,
    pub(crate) add: Vec<FluentId>,
    pub(crate) delete: Vec<FluentId>,
    pub(crate) conditional_effects: Vec<ConditionalEffect>,
    pub(crate) cost: Cost,
}

/// Record of the fluents an in-place progression actually flipped.
///
/// Handing it back to [`Action::regress`] restores the pre-state exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LazyUndo {
    added: Vec<FluentId>,
    deleted: Vec<FluentId>,
}

impl LazyUndo {
    /// True if the progression left the state unchanged.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty()
    }
}

impl Action {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn precondition(&self) -> &[FluentId] {
        &self.precondition
    }

    /// Unconditional add effects.
    #[must_use]
    pub fn add(&self) -> &[FluentId] {
        &self.add
    }

    /// Unconditional delete effects.
    #[must_use]
    pub fn delete(&self) -> &[FluentId] {
        &self.delete
    }

    #[must_use]
    pub fn conditional_effects(&self) -> &[ConditionalEffect] {
        &self.conditional_effects
    }

    #[must_use]
    pub fn cost(&self) -> Cost {
        self.cost
    }

    /// Every fluent this action can add: unconditional adds followed by the
    /// adds of each conditional effect, regardless of whether it would fire.
    pub fn possible_adds(&self) -> impl Iterator<Item = FluentId> + '_ {
        self.add.iter().copied().chain(
            self.conditional_effects
                .iter()
                .flat_map(|ce| ce.add.iter().copied()),
        )
    }

    #[must_use]
    pub fn is_applicable(&self, state: &State) -> bool {
        state.entails_all(&self.precondition)
    }

    /// Apply to a copy of `state`. Applicability is not checked.
    #[must_use]
    pub fn successor(&self, state: &State) -> State {
        let mut next = state.clone();
        let _ = self.progress(&mut next);
        next
    }

    /// Apply in place, returning the undo record.
    pub fn progress(&self, state: &mut State) -> LazyUndo {
        let fired: Vec<&ConditionalEffect> = self
            .conditional_effects
            .iter()
            .filter(|ce| state.entails_all(&ce.condition))
            .collect();

        let mut undo = LazyUndo::default();
        let deletes = self
            .delete
            .iter()
            .chain(fired.iter().flat_map(|ce| ce.delete.iter()));
        for &f in deletes {
            if state.remove(f) {
                undo.deleted.push(f);
            }
        }
        let adds = self
            .add
            .iter()
            .chain(fired.iter().flat_map(|ce| ce.add.iter()));
        for &f in adds {
            if state.insert(f) {
                undo.added.push(f);
            }
        }
        undo
    }

    /// Undo a previous [`Action::progress`] on the same state.
    pub fn regress(&self, state: &mut State, undo: LazyUndo) {
        for f in undo.added {
            state.remove(f);
        }
        for f in undo.deleted {
            state.insert(f);
        }
    }
}
