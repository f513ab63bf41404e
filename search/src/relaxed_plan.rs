//! Relaxed-plan heuristic seam and the relevant-fluent set derived from it.

use iwplan_kernel::carrier::fluent::{ActionId, Cost, FluentId};
use iwplan_kernel::carrier::fluent_set::FluentSet;
use iwplan_kernel::carrier::state::State;
use iwplan_kernel::operators::model::PlanningModel;

/// Output of one relaxed-plan evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelaxedPlanEstimate {
    pub cost: Cost,
    /// Helpful actions; unused by width search but part of the contract.
    pub preferred: Vec<ActionId>,
    /// Ordered relaxed plan.
    pub plan: Vec<ActionId>,
}

/// Source of relaxed plans.
pub trait RelaxedPlanHeuristic {
    /// Compute a relaxed plan from `state` towards `goals`, or towards the
    /// model goal when `goals` is `None`.
    fn evaluate(&mut self, state: &State, goals: Option<&[FluentId]>) -> RelaxedPlanEstimate;
}

/// Heuristic that always answers with the same plan.
///
/// Used by worlds that know a relaxed plan up front.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRelaxedPlan {
    plan: Vec<ActionId>,
}

impl ScriptedRelaxedPlan {
    #[must_use]
    pub fn new(plan: Vec<ActionId>) -> Self {
        Self { plan }
    }
}

impl RelaxedPlanHeuristic for ScriptedRelaxedPlan {
    #[allow(clippy::cast_precision_loss)]
    fn evaluate(&mut self, _state: &State, _goals: Option<&[FluentId]>) -> RelaxedPlanEstimate {
        RelaxedPlanEstimate {
            cost: self.plan.len() as Cost,
            preferred: self.plan.first().copied().into_iter().collect(),
            plan: self.plan.clone(),
        }
    }
}

/// Heuristic with no relaxed plan; leaves the relevant set empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRelaxedPlan;

impl RelaxedPlanHeuristic for NoRelaxedPlan {
    fn evaluate(&mut self, _state: &State, _goals: Option<&[FluentId]>) -> RelaxedPlanEstimate {
        RelaxedPlanEstimate::default()
    }
}

/// Fluents added by some action of the relaxed plan, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct RelevantFluents {
    set: FluentSet,
    order: Vec<FluentId>,
}

impl RelevantFluents {
    #[must_use]
    pub fn new(num_fluents: usize) -> Self {
        Self {
            set: FluentSet::new(num_fluents),
            order: Vec::new(),
        }
    }

    /// Build the set from `plan` in one call.
    #[must_use]
    pub fn from_relaxed_plan<M: PlanningModel + ?Sized>(model: &M, plan: &[ActionId]) -> Self {
        let mut relevant = Self::new(model.num_fluents());
        relevant.extend_from_plan(model, plan);
        relevant
    }

    /// Add every fluent the plan's actions add, conditional-effect adds of an
    /// action before its unconditional adds. Already present fluents keep
    /// their position.
    ///
    /// Action ids must be in range for `model`.
    pub fn extend_from_plan<M: PlanningModel + ?Sized>(&mut self, model: &M, plan: &[ActionId]) {
        for &a in plan {
            let action = model.action(a);
            let conditional = action
                .conditional_effects()
                .iter()
                .flat_map(|ce| ce.add.iter());
            for &f in conditional.chain(action.add()) {
                if self.set.set(f) {
                    self.order.push(f);
                }
            }
        }
    }

    #[must_use]
    pub fn contains(&self, f: FluentId) -> bool {
        self.set.contains(f)
    }

    /// Insertion-ordered fluent list.
    #[must_use]
    pub fn as_slice(&self) -> &[FluentId] {
        &self.order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.set.reset();
        self.order.clear();
    }

    /// Re-size for a model with `num_fluents` fluents, dropping all content.
    pub fn reset_for(&mut self, num_fluents: usize) {
        if self.set.capacity() == num_fluents {
            self.clear();
        } else {
            *self = Self::new(num_fluents);
        }
    }
}
