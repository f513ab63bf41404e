//! Structural properties of every finished search, checked over the whole
//! world catalogue and policy grid.
//!
//! - every node in the arena was accepted with novelty <= B
//! - no two expanded nodes are equivalent under the closed-set key
//! - `g` grows by exactly the transition cost along every edge
//! - a returned plan replays from the initial state to a goal

use iwplan_kernel::operators::model::PlanningModel;
use iwplan_kernel::operators::task::StripsTask;
use iwplan_kernel::proof::replay::replay_plan;
use iwplan_search::engine::{EngineStatus, RpIwEngine};
use iwplan_search::novelty::PartitionedNovelty;
use iwplan_search::plan::Plan;
use iwplan_search::policy::IwPolicyV1;
use iwplan_search::relaxed_plan::ScriptedRelaxedPlan;
use lock_tests::search_test_helpers::{all_worlds, policy_grid};
use test_log::test;

type Engine<'m> = RpIwEngine<'m, StripsTask, PartitionedNovelty, ScriptedRelaxedPlan>;

/// Run every world under every policy and hand the finished engine to `check`.
fn for_each_search(mut check: impl FnMut(&str, &StripsTask, &Engine<'_>, Option<&Plan>)) {
    for world in all_worlds() {
        let task = world.build_task().unwrap();
        let hint = world.relaxed_plan_hint(&task);
        for policy in policy_grid() {
            let mut engine = RpIwEngine::new(
                &task,
                PartitionedNovelty::new(task.num_fluents()),
                ScriptedRelaxedPlan::new(hint.clone()),
                policy.clone(),
            )
            .unwrap();
            let plan = engine.solve(None).unwrap();
            assert!(
                engine.status().is_terminal(),
                "{} left running under {policy:?}",
                world.world_id()
            );
            check(world.world_id(), &task, &engine, plan.as_ref());
        }
    }
}

#[test]
fn accepted_nodes_respect_the_bound() {
    for_each_search(|id, _, engine, _| {
        for (node_id, node) in engine.arena().iter() {
            let novelty = node
                .novelty()
                .unwrap_or_else(|| panic!("{id}: {node_id} has no novelty"));
            assert!(
                novelty <= engine.bound(),
                "{id}: {node_id} accepted with novelty {novelty} over bound {}",
                engine.bound()
            );
        }
    });
}

#[test]
fn no_state_is_expanded_twice() {
    for_each_search(|id, _, engine, _| {
        let arena = engine.arena();
        let closed: Vec<_> = engine.closed().iter().collect();
        let eq = engine.closed().equivalence();
        for (i, &a) in closed.iter().enumerate() {
            assert!(arena.get(a).is_materialized(), "{id}: closed {a} is pending");
            for &b in &closed[i + 1..] {
                assert!(
                    !eq.equivalent(arena.get(a), arena.get(b), arena),
                    "{id}: {a} and {b} were both expanded"
                );
            }
        }
        assert_eq!(closed.len() as u64, engine.stats().expanded, "{id}");
    });
}

#[test]
fn path_cost_accumulates_along_edges() {
    for_each_search(|id, task, engine, _| {
        let arena = engine.arena();
        for (node_id, node) in arena.iter() {
            let (Some(parent), Some(action)) = (node.parent(), node.action()) else {
                assert!(node.g().abs() < f32::EPSILON, "{id}: root has g={}", node.g());
                continue;
            };
            let parent_node = arena.get(parent);
            let parent_state = parent_node
                .state()
                .unwrap_or_else(|| panic!("{id}: parent {parent} of {node_id} is pending"));
            let step = task.transition_cost(parent_state, action);
            assert!(
                (node.g() - (parent_node.g() + step)).abs() < 1e-4,
                "{id}: {node_id} g={} but parent g={} + step {step}",
                node.g(),
                parent_node.g()
            );
            assert_eq!(node.depth(), parent_node.depth() + 1, "{id}: {node_id}");
        }
    });
}

#[test]
fn solved_plans_replay_to_a_goal() {
    for_each_search(|id, task, engine, plan| {
        let EngineStatus::Solved { goal } = *engine.status() else {
            assert!(plan.is_none(), "{id}: plan without a solved status");
            return;
        };
        let plan = plan.unwrap_or_else(|| panic!("{id}: solved without a plan"));
        let verdict = replay_plan(task, &task.initial_state(), &plan.actions)
            .unwrap_or_else(|e| panic!("{id}: replay failed: {e}"));
        assert!((verdict.total_cost - plan.cost).abs() < 1e-4, "{id}");
        assert_eq!(
            engine.arena().state(goal),
            Some(&verdict.final_state),
            "{id}: goal node state differs from replayed state"
        );
        assert_eq!(plan.len(), engine.node(goal).unwrap().depth() as usize, "{id}");
    });
}

#[test]
fn unbounded_search_never_prunes_by_bound() {
    for_each_search(|id, _, engine, _| {
        if engine.bound().is_infinite() {
            assert_eq!(engine.stats().pruned_by_bound, 0, "{id}");
        }
    });
}

#[test]
fn generated_counts_every_accepted_node() {
    for_each_search(|id, _, engine, _| {
        assert_eq!(engine.stats().generated, engine.arena().len() as u64, "{id}");
        assert!(engine.stats().expanded <= engine.stats().generated, "{id}");
    });
}

#[test]
fn default_policy_is_in_the_grid() {
    assert!(policy_grid().contains(&IwPolicyV1::default()));
}
