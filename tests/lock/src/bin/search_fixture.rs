//! Binary that runs every shipped world through the harness runner and
//! prints deterministic output lines for cross-process verification.
//!
//! Usage: `search_fixture`
//!
//! Output: one `world=<id> bound=<b> status=<s> report_digest=<d> plan=<names>`
//! line per world, followed by `worlds=<n>`.

use iwplan_harness::runner::run_world;
use iwplan_search::observer::NullObserver;
use iwplan_search::policy::IwPolicyV1;
use lock_tests::search_test_helpers::all_worlds;

fn main() {
    let worlds = all_worlds();
    for world in &worlds {
        for bound in [1.0, f32::INFINITY] {
            let policy = IwPolicyV1::with_bound(bound);
            let outcome =
                run_world(world.as_ref(), &policy, NullObserver).expect("world run failed");
            let digest = outcome.report.digest().expect("report digest failed");
            let plan = outcome
                .plan_names()
                .map_or_else(|| "-".to_string(), |names| names.join(","));
            println!(
                "world={} bound={} status={} report_digest={} plan={plan}",
                world.world_id(),
                outcome.report.bound,
                outcome.report.status,
                digest.as_str(),
            );
        }
    }
    println!("worlds={}", worlds.len());
}
