//! World implementations for the harness runner.

pub mod blocks;
pub mod degenerate;
pub mod key_door;
pub mod switchboard;

use iwplan_kernel::carrier::fluent::ActionId;
use iwplan_kernel::operators::task::StripsTask;

/// Resolve action names against `task`, skipping names it does not define.
pub(crate) fn actions_named(task: &StripsTask, names: &[&str]) -> Vec<ActionId> {
    names.iter().filter_map(|n| task.action_id(n)).collect()
}
