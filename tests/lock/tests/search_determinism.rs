//! In-process determinism: repeated runs produce byte-identical reports.

use iwplan_harness::runner::run_world;
use iwplan_search::observer::NullObserver;
use lock_tests::search_test_helpers::{all_worlds, policy_grid};

const RUNS: usize = 10;

#[test]
fn report_digest_deterministic_n10() {
    for world in all_worlds() {
        for policy in policy_grid() {
            let first = run_world(world.as_ref(), &policy, NullObserver).unwrap();
            let first_digest = first.report.digest().unwrap();
            for i in 1..RUNS {
                let again = run_world(world.as_ref(), &policy, NullObserver).unwrap();
                assert_eq!(
                    first_digest,
                    again.report.digest().unwrap(),
                    "{} report digest differed on run {i}",
                    world.world_id()
                );
            }
        }
    }
}

#[test]
fn report_bytes_deterministic_n10() {
    for world in all_worlds() {
        let policy = iwplan_search::policy::IwPolicyV1::default();
        let first = run_world(world.as_ref(), &policy, NullObserver)
            .unwrap()
            .report
            .canonical_bytes()
            .unwrap();
        for i in 1..RUNS {
            let again = run_world(world.as_ref(), &policy, NullObserver)
                .unwrap()
                .report
                .canonical_bytes()
                .unwrap();
            assert_eq!(first, again, "{} report bytes differed on run {i}", world.world_id());
        }
    }
}

#[test]
fn distinct_policies_produce_distinct_reports() {
    let worlds = all_worlds();
    let world = &worlds[2];
    let digests: std::collections::BTreeSet<_> = policy_grid()
        .iter()
        .map(|p| {
            run_world(world.as_ref(), p, NullObserver)
                .unwrap()
                .report
                .digest()
                .unwrap()
        })
        .collect();
    assert_eq!(digests.len(), policy_grid().len());
}

#[test]
fn task_digest_is_stable_across_builds() {
    for world in all_worlds() {
        let a = iwplan_kernel::proof::hash::task_digest(&world.build_task().unwrap()).unwrap();
        let b = iwplan_kernel::proof::hash::task_digest(&world.build_task().unwrap()).unwrap();
        assert_eq!(a, b, "{}", world.world_id());
        assert!(a.as_str().starts_with("sha256:"));
    }
}
