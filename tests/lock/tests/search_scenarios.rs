//! End-to-end scenarios through the harness runner.

use iwplan_harness::contract::PlanningWorldV1;
use iwplan_harness::runner::{run_world, RunOutcomeV1};
use iwplan_harness::worlds::blocks::BlocksWorld;
use iwplan_harness::worlds::degenerate::{GoalAtStart, Unreachable};
use iwplan_harness::worlds::key_door::{KeyDoor, KeyDoorHint};
use iwplan_harness::worlds::switchboard::{Switchboard, Wiring};
use iwplan_kernel::operators::model::PlanningModel;
use iwplan_search::engine::{EngineStatus, RpIwEngine};
use iwplan_search::novelty::PartitionedNovelty;
use iwplan_search::observer::{NullObserver, RecordingObserver};
use iwplan_search::policy::{ExpansionModeV1, IwPolicyV1};
use iwplan_search::relaxed_plan::ScriptedRelaxedPlan;
use lock_tests::search_test_helpers::{all_worlds, policy_grid};
use test_log::test;

fn run(world: &dyn PlanningWorldV1, policy: &IwPolicyV1) -> RunOutcomeV1 {
    run_world(world, policy, NullObserver).unwrap()
}

// ---------------------------------------------------------------------------
// Goal already satisfied
// ---------------------------------------------------------------------------

#[test]
fn goal_at_start_solves_without_expanding() {
    for policy in policy_grid() {
        let out = run(&GoalAtStart, &policy);
        assert!(out.is_solved());
        assert_eq!(out.plan.as_ref().map(|p| p.len()), Some(0));
        assert_eq!(out.stats.expanded, 0);
        assert_eq!(out.stats.generated, 1);
        assert_eq!(out.report.plan_cost.as_deref(), Some("0.000"));
    }
}

// ---------------------------------------------------------------------------
// Unreachable goal
// ---------------------------------------------------------------------------

#[test]
fn unreachable_goal_is_exhausted_under_every_policy() {
    for policy in policy_grid() {
        let out = run(&Unreachable, &policy);
        assert_eq!(out.status, EngineStatus::Exhausted);
        assert!(out.plan.is_none());
        assert!(out.report.plan.is_none());
        assert!(!out.stats.root_pruned);
    }
}

#[test]
fn unreachable_goal_visits_each_state_once_per_partition() {
    let plain = IwPolicyV1 {
        use_relaxed_plan: false,
        ..IwPolicyV1::default()
    };
    let out = run(&Unreachable, &plain);
    // {a} and {c}; returning to {a} is a closed duplicate.
    assert_eq!(out.stats.expanded, 2);
    assert_eq!(out.stats.generated, 2);
    assert_eq!(out.stats.pruned_closed, 1);

    // With both fluents relevant, {a} and {c} are revisited once more in
    // the partition where both have been added.
    let partitioned = run(&Unreachable, &IwPolicyV1::default());
    assert_eq!(partitioned.stats.expanded, 4);
    assert_eq!(partitioned.stats.generated, 4);
}

// ---------------------------------------------------------------------------
// Width grows until the goal is reachable
// ---------------------------------------------------------------------------

#[test]
fn goal_only_hint_needs_width_two() {
    let world = KeyDoor::new(KeyDoorHint::GoalOnly);
    let narrow = run(&world, &IwPolicyV1::with_bound(1.0));
    assert_eq!(narrow.status, EngineStatus::Exhausted);
    assert!(narrow.stats.pruned_by_bound > 0);

    let wide = run(&world, &IwPolicyV1::with_bound(2.0));
    assert!(wide.is_solved());
    assert_eq!(
        wide.plan_names().unwrap(),
        ["move-0-1", "pick-key", "move-1-0", "open-door"]
    );
    assert_eq!(narrow.relevant_fluents, wide.relevant_fluents);
    assert_eq!(wide.report.relevant_fluents, ["door-open"]);
}

#[test]
fn full_route_hint_solves_at_width_one() {
    let mut recorder = RecordingObserver::default();
    let out = run_world(
        &KeyDoor::new(KeyDoorHint::FullRoute),
        &IwPolicyV1::with_bound(1.0),
        &mut recorder,
    )
    .unwrap();
    assert!(out.is_solved());
    assert_eq!(
        out.report.relevant_fluents,
        ["at-1", "has-key", "at-0", "door-open"]
    );
    assert!(recorder.completed);
    assert!(!recorder.root_pruned);
}

// ---------------------------------------------------------------------------
// Conditional effects feed the relevant set
// ---------------------------------------------------------------------------

#[test]
fn conditional_add_is_relevant_and_solves() {
    let policy = IwPolicyV1::with_bound(1.0);
    let conditional = run(&Switchboard::default(), &policy);
    let direct = run(
        &Switchboard {
            wiring: Wiring::Direct,
        },
        &policy,
    );
    assert_eq!(
        conditional.report.relevant_fluents,
        ["plugged", "lever-up", "lamp-on"]
    );
    assert_eq!(conditional.report.relevant_fluents, direct.report.relevant_fluents);
    assert_eq!(
        conditional.plan_names().unwrap(),
        ["plug-in", "raise-lever", "press-switch"]
    );
    assert_eq!(conditional.plan_names(), direct.plan_names());
}

#[test]
fn conditional_add_counts_toward_the_partition() {
    let goal_partition = |wiring| {
        let world = Switchboard { wiring };
        let task = world.build_task().unwrap();
        let mut engine = RpIwEngine::new(
            &task,
            PartitionedNovelty::new(task.num_fluents()),
            ScriptedRelaxedPlan::new(world.relaxed_plan_hint(&task)),
            IwPolicyV1::with_bound(1.0),
        )
        .unwrap();
        engine.solve(None).unwrap();
        let EngineStatus::Solved { goal } = *engine.status() else {
            panic!("{wiring:?} switchboard not solved");
        };
        engine.node(goal).unwrap().partition()
    };
    assert_eq!(goal_partition(Wiring::Conditional), 3);
    assert_eq!(goal_partition(Wiring::Direct), 3);
}

// ---------------------------------------------------------------------------
// Zero bound and disabled partitions
// ---------------------------------------------------------------------------

#[test]
fn zero_bound_prunes_every_root() {
    for world in all_worlds() {
        let out = run(world.as_ref(), &IwPolicyV1::with_bound(0.0));
        assert_eq!(out.status, EngineStatus::Exhausted, "{}", world.world_id());
        assert!(out.stats.root_pruned, "{}", world.world_id());
        assert_eq!(out.stats.generated, 0, "{}", world.world_id());
    }
}

#[test]
fn disabling_relaxed_plan_empties_relevant_set() {
    let policy = IwPolicyV1 {
        use_relaxed_plan: false,
        ..IwPolicyV1::default()
    };
    for world in all_worlds() {
        let out = run(world.as_ref(), &policy);
        assert!(out.relevant_fluents.is_empty(), "{}", world.world_id());
        assert_eq!(out.stats.relevant_fluents, 0);
    }
}

// ---------------------------------------------------------------------------
// Lazy expansion
// ---------------------------------------------------------------------------

#[test]
fn lazy_expansion_returns_the_eager_plan() {
    for world in all_worlds() {
        for bound in [1.0, 2.0, f32::INFINITY] {
            let eager = run(world.as_ref(), &IwPolicyV1::with_bound(bound));
            let lazy = run(
                world.as_ref(),
                &IwPolicyV1 {
                    expansion: ExpansionModeV1::Lazy,
                    ..IwPolicyV1::with_bound(bound)
                },
            );
            assert_eq!(
                eager.status.as_str(),
                lazy.status.as_str(),
                "{} at bound {bound}",
                world.world_id()
            );
            assert_eq!(
                eager.plan_names(),
                lazy.plan_names(),
                "{} at bound {bound}",
                world.world_id()
            );
            assert_eq!(lazy.report.expansion, "lazy");
        }
    }
}

#[test]
fn blocks_tower_is_built_bottom_up() {
    let out = run(&BlocksWorld::tower(3), &IwPolicyV1::default());
    let names = out.plan_names().unwrap();
    assert_eq!(names.len(), 4);
    assert_eq!(names.last(), Some(&"stack(b2,b1)"));
}
