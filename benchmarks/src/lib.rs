//! Shared helpers for iwplan benchmark suites.

use iwplan_harness::contract::PlanningWorldV1;
use iwplan_kernel::carrier::fluent::ActionId;
use iwplan_kernel::operators::model::PlanningModel;
use iwplan_kernel::operators::task::StripsTask;
use iwplan_search::engine::RpIwEngine;
use iwplan_search::novelty::PartitionedNovelty;
use iwplan_search::plan::Plan;
use iwplan_search::policy::IwPolicyV1;
use iwplan_search::relaxed_plan::ScriptedRelaxedPlan;

/// A built task and its relaxed plan hint, so benchmarks time only the search.
pub struct SearchSetup {
    pub task: StripsTask,
    pub hint: Vec<ActionId>,
}

/// Build the task and hint once for a world.
///
/// # Panics
///
/// Panics if the world cannot be built. Benchmark setup failures are fatal.
pub fn prepare_search_setup(world: &dyn PlanningWorldV1) -> SearchSetup {
    let task = world.build_task().expect("world builds");
    let hint = world.relaxed_plan_hint(&task);
    SearchSetup { task, hint }
}

/// Run one search over a prepared setup.
///
/// # Panics
///
/// Panics if the policy is rejected.
pub fn run_search_only(setup: &SearchSetup, policy: &IwPolicyV1) -> Option<Plan> {
    let mut engine = RpIwEngine::new(
        &setup.task,
        PartitionedNovelty::new(setup.task.num_fluents()),
        ScriptedRelaxedPlan::new(setup.hint.clone()),
        policy.clone(),
    )
    .expect("valid policy");
    engine.solve(None).expect("search pre-flight")
}
