//! Key-and-door corridor: width 2 without relevant-fluent partitions,
//! width 1 with them.
//!
//! ```text
//! [door | room-0] <-> [room-1 | key]
//! ```
//!
//! The agent starts in room 0, must fetch the key from room 1 and come back
//! to open the door. Returning to room 0 with the key revisits `at-0`, so
//! plain IW(1) prunes that state; counting the relaxed plan's fluents along
//! the path puts it in a fresh partition.

use iwplan_kernel::carrier::fluent::ActionId;
use iwplan_kernel::operators::task::{ActionSpec, StripsTask, TaskBuilder};

use crate::contract::{PlanningWorldV1, WorldError};
use crate::worlds::actions_named;

/// Which relaxed plan the world hands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDoorHint {
    /// The whole route: `move-0-1`, `pick-key`, `move-1-0`, `open-door`.
    FullRoute,
    /// Only the final `open-door` step.
    GoalOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDoor {
    hint: KeyDoorHint,
}

impl KeyDoor {
    #[must_use]
    pub fn new(hint: KeyDoorHint) -> Self {
        Self { hint }
    }
}

impl Default for KeyDoor {
    fn default() -> Self {
        Self::new(KeyDoorHint::FullRoute)
    }
}

impl PlanningWorldV1 for KeyDoor {
    fn world_id(&self) -> &str {
        match self.hint {
            KeyDoorHint::FullRoute => "key_door",
            KeyDoorHint::GoalOnly => "key_door_goal_hint",
        }
    }

    fn build_task(&self) -> Result<StripsTask, WorldError> {
        let mut b = TaskBuilder::new("key_door");
        let at0 = b.fluent("at-0")?;
        let at1 = b.fluent("at-1")?;
        let key = b.fluent("has-key")?;
        let open = b.fluent("door-open")?;
        b.action(ActionSpec::new("move-0-1").pre([at0]).add([at1]).del([at0]));
        b.action(ActionSpec::new("move-1-0").pre([at1]).add([at0]).del([at1]));
        b.action(ActionSpec::new("pick-key").pre([at1]).add([key]));
        b.action(ActionSpec::new("open-door").pre([at0, key]).add([open]));
        b.init([at0]).goal([open]);
        Ok(b.build()?)
    }

    fn relaxed_plan_hint(&self, task: &StripsTask) -> Vec<ActionId> {
        let names: &[&str] = match self.hint {
            KeyDoorHint::FullRoute => &["move-0-1", "pick-key", "move-1-0", "open-door"],
            KeyDoorHint::GoalOnly => &["open-door"],
        };
        actions_named(task, names)
    }
}
