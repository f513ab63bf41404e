//! Switchboard: the lamp comes on only through a conditional effect.
//!
//! `press-switch` has no unconditional effect; when the board is plugged in
//! and the lever is up it adds `lamp-on`. The `Direct` wiring replaces the
//! conditional effect with a precondition plus a plain add, so the two
//! variants can be compared.

use iwplan_kernel::carrier::fluent::ActionId;
use iwplan_kernel::operators::task::{ActionSpec, StripsTask, TaskBuilder};

use crate::contract::{PlanningWorldV1, WorldError};
use crate::worlds::actions_named;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Wiring {
    #[default]
    Conditional,
    Direct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Switchboard {
    pub wiring: Wiring,
}

impl PlanningWorldV1 for Switchboard {
    fn world_id(&self) -> &str {
        match self.wiring {
            Wiring::Conditional => "switchboard",
            Wiring::Direct => "switchboard_direct",
        }
    }

    fn build_task(&self) -> Result<StripsTask, WorldError> {
        let mut b = TaskBuilder::new(self.world_id());
        let unplugged = b.fluent("unplugged")?;
        let plugged = b.fluent("plugged")?;
        let lever = b.fluent("lever-up")?;
        let lamp = b.fluent("lamp-on")?;
        b.action(
            ActionSpec::new("plug-in")
                .pre([unplugged])
                .add([plugged])
                .del([unplugged]),
        );
        b.action(ActionSpec::new("raise-lever").add([lever]));
        let press = ActionSpec::new("press-switch");
        b.action(match self.wiring {
            Wiring::Conditional => press.when([plugged, lever], [lamp], []),
            Wiring::Direct => press.pre([plugged, lever]).add([lamp]),
        });
        b.init([unplugged]).goal([lamp]);
        Ok(b.build()?)
    }

    fn relaxed_plan_hint(&self, task: &StripsTask) -> Vec<ActionId> {
        actions_named(task, &["plug-in", "raise-lever", "press-switch"])
    }
}
