//! World contract: the minimal trait a world must implement.
//!
//! Worlds provide a STRIPS task and, optionally, a relaxed plan hint. Worlds
//! may NOT search, replay or hash; those are runner and kernel concerns.

use iwplan_kernel::carrier::fluent::ActionId;
use iwplan_kernel::operators::task::{StripsTask, TaskError};

/// Typed failure for world construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// The world's parameters are inconsistent.
    InvalidParameters { detail: String },
    /// The task builder rejected the world's encoding.
    TaskBuildFailed { detail: String },
}

impl std::fmt::Display for WorldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidParameters { detail } => write!(f, "invalid world parameters: {detail}"),
            Self::TaskBuildFailed { detail } => write!(f, "task build failed: {detail}"),
        }
    }
}

impl std::error::Error for WorldError {}

impl From<TaskError> for WorldError {
    fn from(e: TaskError) -> Self {
        Self::TaskBuildFailed {
            detail: e.to_string(),
        }
    }
}

/// The contract a world must implement to be run by the harness runner.
pub trait PlanningWorldV1 {
    /// Unique world identifier (e.g., `"key_door"`).
    fn world_id(&self) -> &str;

    /// Build the world's task.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError`] if the world's parameters do not describe a
    /// valid task.
    fn build_task(&self) -> Result<StripsTask, WorldError>;

    /// A relaxed plan from the initial state, if the world knows one.
    ///
    /// Ids refer to `task`, which is the value `build_task` returned.
    fn relaxed_plan_hint(&self, _task: &StripsTask) -> Vec<ActionId> {
        Vec::new()
    }
}
