//! Plan extraction by back-chaining parent links.

use iwplan_kernel::carrier::fluent::{ActionId, Cost};
use iwplan_kernel::operators::model::PlanningModel;

use crate::node::{NodeArena, NodeId};

/// A root-to-goal action sequence and its summed transition cost.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plan {
    pub actions: Vec<ActionId>,
    pub cost: Cost,
}

impl Plan {
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Walk from `goal` to the root, summing `transition_cost(parent state,
/// action)` per edge, and return the plan in root-to-goal order.
///
/// Pending ancestors are materialized on the way.
pub fn extract_plan<M: PlanningModel + ?Sized>(
    arena: &mut NodeArena,
    model: &M,
    goal: NodeId,
) -> Plan {
    let mut edges: Vec<(ActionId, Cost)> = Vec::new();
    let mut cursor = goal;
    while let (Some(parent), Some(action)) = (arena.get(cursor).parent(), arena.get(cursor).action())
    {
        let parent_state = arena.materialize(parent, model);
        edges.push((action, model.transition_cost(parent_state, action)));
        cursor = parent;
    }
    edges.reverse();
    // Summed root-first, the same order `g` accumulates in.
    let cost = edges.iter().fold(0.0, |acc, &(_, c)| acc + c);
    Plan {
        actions: edges.into_iter().map(|(a, _)| a).collect(),
        cost,
    }
}
