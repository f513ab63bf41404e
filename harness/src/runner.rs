//! Harness runner: search a world and package the result.
//!
//! # Pipeline
//!
//! ```text
//! build_task() → task_digest()
//!   → RpIwEngine::solve() (partitioned novelty, scripted relaxed plan)
//!   → replay_plan() → cost cross-check → SearchReportV1
//! ```
//!
//! The runner uses only kernel and search APIs. A plan that fails replay is
//! a runner error, never a silent success.

use iwplan_kernel::carrier::fluent::{Cost, FluentId};
use iwplan_kernel::operators::model::PlanningModel;
use iwplan_kernel::operators::task::StripsTask;
use iwplan_kernel::proof::hash::{cost_to_string, task_digest};
use iwplan_kernel::proof::replay::{replay_plan, ReplayVerdict};
use iwplan_search::engine::{EngineStatus, RpIwEngine};
use iwplan_search::error::SearchError;
use iwplan_search::novelty::PartitionedNovelty;
use iwplan_search::observer::SearchObserver;
use iwplan_search::plan::Plan;
use iwplan_search::policy::IwPolicyV1;
use iwplan_search::relaxed_plan::ScriptedRelaxedPlan;
use iwplan_search::stats::SearchStats;
use log::info;

use crate::contract::{PlanningWorldV1, WorldError};
use crate::report::{ReportInputs, SearchReportV1};

/// Error during a harness run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunError {
    /// World construction failed.
    WorldError(WorldError),
    /// Search pre-flight failed.
    SearchFailed(SearchError),
    /// The found plan did not replay to a goal, or its cost disagreed.
    ReplayFailed { detail: String },
    /// Canonical JSON serialization failed.
    CanonFailed { detail: String },
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WorldError(e) => write!(f, "world error: {e}"),
            Self::SearchFailed(e) => write!(f, "search error: {e}"),
            Self::ReplayFailed { detail } => write!(f, "replay failed: {detail}"),
            Self::CanonFailed { detail } => write!(f, "canonical JSON error: {detail}"),
        }
    }
}

impl std::error::Error for RunError {}

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct RunOutcomeV1 {
    pub task: StripsTask,
    pub plan: Option<Plan>,
    /// Present exactly when `plan` is.
    pub replay: Option<ReplayVerdict>,
    pub status: EngineStatus,
    pub stats: SearchStats,
    pub relevant_fluents: Vec<FluentId>,
    pub report: SearchReportV1,
}

impl RunOutcomeV1 {
    #[must_use]
    pub fn is_solved(&self) -> bool {
        matches!(self.status, EngineStatus::Solved { .. })
    }

    /// Plan as action names, root to goal.
    #[must_use]
    pub fn plan_names(&self) -> Option<Vec<&str>> {
        self.plan.as_ref().map(|p| {
            p.actions
                .iter()
                .map(|&a| self.task.action(a).name())
                .collect()
        })
    }
}

fn costs_agree(a: Cost, b: Cost) -> bool {
    (a - b).abs() <= f32::EPSILON * a.abs().max(b.abs()).max(1.0)
}

/// Search `world` under `policy` and replay the result.
///
/// The world's relaxed plan hint feeds the relevant-fluent set when
/// `policy.use_relaxed_plan` is set.
///
/// # Errors
///
/// Returns [`RunError`] if the world cannot be built, the policy is
/// rejected, or a found plan does not survive replay. Exhaustion is not an
/// error.
pub fn run_world(
    world: &dyn PlanningWorldV1,
    policy: &IwPolicyV1,
    observer: impl SearchObserver,
) -> Result<RunOutcomeV1, RunError> {
    let task = world.build_task().map_err(RunError::WorldError)?;
    let digest = task_digest(&task).map_err(|e| RunError::CanonFailed {
        detail: e.to_string(),
    })?;
    let hint = world.relaxed_plan_hint(&task);

    let (plan, status, stats, relevant_fluents) = {
        let mut engine = RpIwEngine::new(
            &task,
            PartitionedNovelty::new(task.num_fluents()),
            ScriptedRelaxedPlan::new(hint),
            policy.clone(),
        )
        .map_err(RunError::SearchFailed)?
        .with_observer(observer);
        let plan = engine.solve(None).map_err(RunError::SearchFailed)?;
        (
            plan,
            engine.status().clone(),
            engine.stats().clone(),
            engine.relevant_fluents().to_vec(),
        )
    };

    let replay = match &plan {
        Some(p) => {
            let verdict = replay_plan(&task, &task.initial_state(), &p.actions).map_err(|e| {
                RunError::ReplayFailed {
                    detail: e.to_string(),
                }
            })?;
            if !costs_agree(verdict.total_cost, p.cost) {
                return Err(RunError::ReplayFailed {
                    detail: format!(
                        "plan cost {} but replay cost {}",
                        cost_to_string(p.cost),
                        cost_to_string(verdict.total_cost)
                    ),
                });
            }
            Some(verdict)
        }
        None => None,
    };

    info!(
        "{}: {} after {} expansions",
        world.world_id(),
        status.as_str(),
        stats.expanded
    );

    let report = SearchReportV1::build(&ReportInputs {
        world_id: world.world_id(),
        task: &task,
        task_digest: digest,
        policy,
        status: &status,
        plan: plan.as_ref(),
        stats: &stats,
        relevant: &relevant_fluents,
    });

    Ok(RunOutcomeV1 {
        task,
        plan,
        replay,
        status,
        stats,
        relevant_fluents,
        report,
    })
}
