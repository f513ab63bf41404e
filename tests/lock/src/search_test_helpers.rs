//! World catalogue and policy presets shared by lock tests.

use iwplan_harness::contract::PlanningWorldV1;
use iwplan_harness::worlds::blocks::BlocksWorld;
use iwplan_harness::worlds::degenerate::{GoalAtStart, Unreachable};
use iwplan_harness::worlds::key_door::{KeyDoor, KeyDoorHint};
use iwplan_harness::worlds::switchboard::{Switchboard, Wiring};
use iwplan_search::policy::{ExpansionModeV1, IwPolicyV1};

/// Every shipped world, in a fixed order.
#[must_use]
pub fn all_worlds() -> Vec<Box<dyn PlanningWorldV1>> {
    vec![
        Box::new(GoalAtStart),
        Box::new(Unreachable),
        Box::new(KeyDoor::new(KeyDoorHint::FullRoute)),
        Box::new(KeyDoor::new(KeyDoorHint::GoalOnly)),
        Box::new(Switchboard::default()),
        Box::new(Switchboard {
            wiring: Wiring::Direct,
        }),
        Box::new(BlocksWorld::sussman()),
        Box::new(BlocksWorld::tower(3)),
    ]
}

/// Bounds 1, 2 and unbounded, each eager and lazy.
#[must_use]
pub fn policy_grid() -> Vec<IwPolicyV1> {
    let mut out = Vec::new();
    for bound in [1.0, 2.0, f32::INFINITY] {
        for expansion in [ExpansionModeV1::Eager, ExpansionModeV1::Lazy] {
            out.push(IwPolicyV1 {
                expansion,
                ..IwPolicyV1::with_bound(bound)
            });
        }
    }
    out
}
