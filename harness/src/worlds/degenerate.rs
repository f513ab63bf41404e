//! Edge-case worlds: a goal that already holds and a goal nothing adds.

use iwplan_kernel::carrier::fluent::ActionId;
use iwplan_kernel::operators::task::{ActionSpec, StripsTask, TaskBuilder};

use crate::contract::{PlanningWorldV1, WorldError};

/// The initial state already satisfies the goal.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoalAtStart;

impl PlanningWorldV1 for GoalAtStart {
    fn world_id(&self) -> &str {
        "goal_at_start"
    }

    fn build_task(&self) -> Result<StripsTask, WorldError> {
        let mut b = TaskBuilder::new("goal_at_start");
        let ready = b.fluent("ready")?;
        let busy = b.fluent("busy")?;
        b.action(ActionSpec::new("work").pre([ready]).add([busy]).del([ready]));
        b.init([ready]).goal([ready]);
        Ok(b.build()?)
    }
}

/// No action adds the goal fluent.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unreachable;

impl PlanningWorldV1 for Unreachable {
    fn world_id(&self) -> &str {
        "unreachable"
    }

    fn build_task(&self) -> Result<StripsTask, WorldError> {
        let mut b = TaskBuilder::new("unreachable");
        let a = b.fluent("a")?;
        let c = b.fluent("c")?;
        let treasure = b.fluent("treasure")?;
        b.action(ActionSpec::new("a-to-c").pre([a]).add([c]).del([a]));
        b.action(ActionSpec::new("c-to-a").pre([c]).add([a]).del([c]));
        b.init([a]).goal([treasure]);
        Ok(b.build()?)
    }

    /// Every action, as a delete relaxation would try them.
    fn relaxed_plan_hint(&self, task: &StripsTask) -> Vec<ActionId> {
        (0..task.actions().len())
            .filter_map(ActionId::from_index)
            .collect()
    }
}
