//! Search reports: a deterministic, content-addressed record of one run.
//!
//! # Directory layout
//!
//! ```text
//! <dir>/
//!   search_report.json          canonical JSON report
//!   search_report_digest.txt    "sha256:..." over the report bytes
//! ```
//!
//! # Fail-closed semantics
//!
//! Reading rejects a missing file, a report that is not canonical JSON, an
//! unknown `schema_version` and a digest that does not match the bytes.

use std::path::Path;

use iwplan_kernel::carrier::fluent::FluentId;
use iwplan_kernel::operators::model::PlanningModel;
use iwplan_kernel::operators::task::StripsTask;
use iwplan_kernel::proof::canon::{canonical_json_bytes, CanonError};
use iwplan_kernel::proof::hash::{
    canonical_hash, cost_to_string, ContentHash, DOMAIN_SEARCH_REPORT,
};
use iwplan_search::engine::EngineStatus;
use iwplan_search::plan::Plan;
use iwplan_search::policy::{ExpansionModeV1, IwPolicyV1};
use iwplan_search::stats::SearchStats;

pub const REPORT_SCHEMA_VERSION: &str = "search_report.v1";
pub const REPORT_FILENAME: &str = "search_report.json";
pub const REPORT_DIGEST_FILENAME: &str = "search_report_digest.txt";

/// One search run, rendered with names rather than ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReportV1 {
    pub world_id: String,
    pub task_digest: ContentHash,
    /// `"inf"` or a fixed-precision decimal.
    pub bound: String,
    pub use_relaxed_plan: bool,
    pub expansion: String,
    pub closed_equivalence: String,
    pub open_equivalence: String,
    pub goal_override: Option<Vec<String>>,
    pub status: String,
    /// Action names, root to goal. `None` when no plan was found.
    pub plan: Option<Vec<String>>,
    pub plan_cost: Option<String>,
    pub stats: SearchStats,
    pub relevant_fluents: Vec<String>,
}

/// Everything a report is assembled from.
pub struct ReportInputs<'a> {
    pub world_id: &'a str,
    pub task: &'a StripsTask,
    pub task_digest: ContentHash,
    pub policy: &'a IwPolicyV1,
    pub status: &'a EngineStatus,
    pub plan: Option<&'a Plan>,
    pub stats: &'a SearchStats,
    pub relevant: &'a [FluentId],
}

#[must_use]
pub fn bound_to_string(bound: f32) -> String {
    if bound.is_infinite() {
        "inf".to_string()
    } else {
        cost_to_string(bound)
    }
}

fn fluent_names(task: &StripsTask, fluents: &[FluentId]) -> Vec<String> {
    fluents
        .iter()
        .map(|&f| task.fluent_name(f).map_or_else(|| f.to_string(), str::to_string))
        .collect()
}

impl SearchReportV1 {
    #[must_use]
    pub fn build(inputs: &ReportInputs<'_>) -> Self {
        let task = inputs.task;
        let policy = inputs.policy;
        Self {
            world_id: inputs.world_id.to_string(),
            task_digest: inputs.task_digest.clone(),
            bound: bound_to_string(policy.bound),
            use_relaxed_plan: policy.use_relaxed_plan,
            expansion: match policy.expansion {
                ExpansionModeV1::Eager => "eager".to_string(),
                ExpansionModeV1::Lazy => "lazy".to_string(),
            },
            closed_equivalence: policy.closed_equivalence.as_str().to_string(),
            open_equivalence: policy.open_equivalence.as_str().to_string(),
            goal_override: policy
                .goal_override
                .as_ref()
                .map(|g| fluent_names(task, g)),
            status: inputs.status.as_str().to_string(),
            plan: inputs.plan.map(|p| {
                p.actions
                    .iter()
                    .map(|&a| task.action(a).name().to_string())
                    .collect()
            }),
            plan_cost: inputs.plan.map(|p| cost_to_string(p.cost)),
            stats: inputs.stats.clone(),
            relevant_fluents: fluent_names(task, inputs.relevant),
        }
    }

    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "schema_version": REPORT_SCHEMA_VERSION,
            "world_id": self.world_id,
            "task_digest": self.task_digest.as_str(),
            "policy": {
                "bound": self.bound,
                "closed_equivalence": self.closed_equivalence,
                "expansion": self.expansion,
                "goal_override": self.goal_override,
                "open_equivalence": self.open_equivalence,
                "use_relaxed_plan": self.use_relaxed_plan,
            },
            "status": self.status,
            "plan": self.plan,
            "plan_cost": self.plan_cost,
            "stats": self.stats.to_json_value(),
            "relevant_fluents": self.relevant_fluents,
        })
    }

    /// # Errors
    ///
    /// Returns [`CanonError`] if canonical serialization fails.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, CanonError> {
        canonical_json_bytes(&self.to_json_value())
    }

    /// Content address of the canonical report bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if canonical serialization fails.
    pub fn digest(&self) -> Result<ContentHash, CanonError> {
        Ok(canonical_hash(DOMAIN_SEARCH_REPORT, &self.canonical_bytes()?))
    }
}

/// Error persisting or loading a report directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportDirError {
    Io { detail: String },
    MissingFile { filename: String },
    CanonError { detail: String },
    ParseError { detail: String },
    /// Report bytes differ from their canonical re-serialization.
    NotCanonical,
    SchemaMismatch { found: String },
    DigestMismatch { stored: String, recomputed: String },
}

impl std::fmt::Display for ReportDirError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { detail } => write!(f, "I/O error: {detail}"),
            Self::MissingFile { filename } => write!(f, "missing file: {filename}"),
            Self::CanonError { detail } => write!(f, "canonical JSON error: {detail}"),
            Self::ParseError { detail } => write!(f, "report parse error: {detail}"),
            Self::NotCanonical => write!(f, "report is not canonical JSON"),
            Self::SchemaMismatch { found } => write!(f, "schema version mismatch: {found}"),
            Self::DigestMismatch { stored, recomputed } => {
                write!(f, "digest mismatch: stored={stored}, recomputed={recomputed}")
            }
        }
    }
}

impl std::error::Error for ReportDirError {}

/// A report read back from disk with its verified digest.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedReportV1 {
    pub bytes: Vec<u8>,
    pub value: serde_json::Value,
    pub digest: ContentHash,
}

/// Write `report` into `dir`, creating it if needed. Returns the digest.
///
/// # Errors
///
/// Returns [`ReportDirError`] on I/O or canonical JSON failure.
pub fn write_report_dir(report: &SearchReportV1, dir: &Path) -> Result<ContentHash, ReportDirError> {
    let bytes = report
        .canonical_bytes()
        .map_err(|e| ReportDirError::CanonError {
            detail: e.to_string(),
        })?;
    let digest = canonical_hash(DOMAIN_SEARCH_REPORT, &bytes);

    std::fs::create_dir_all(dir).map_err(|e| ReportDirError::Io {
        detail: format!("create_dir_all: {e}"),
    })?;
    write_atomic(&dir.join(REPORT_FILENAME), &bytes)?;
    write_atomic(&dir.join(REPORT_DIGEST_FILENAME), digest.as_str().as_bytes())?;
    Ok(digest)
}

/// Read and verify a report directory.
///
/// # Errors
///
/// Returns [`ReportDirError`] on any validation failure.
pub fn read_report_dir(dir: &Path) -> Result<PersistedReportV1, ReportDirError> {
    let bytes = read_required(dir, REPORT_FILENAME)?;
    let stored = read_required(dir, REPORT_DIGEST_FILENAME)?;

    let value: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|e| ReportDirError::ParseError {
            detail: e.to_string(),
        })?;
    let canonical = canonical_json_bytes(&value).map_err(|e| ReportDirError::CanonError {
        detail: e.to_string(),
    })?;
    if canonical != bytes {
        return Err(ReportDirError::NotCanonical);
    }

    let schema = value["schema_version"].as_str().unwrap_or("");
    if schema != REPORT_SCHEMA_VERSION {
        return Err(ReportDirError::SchemaMismatch {
            found: schema.to_string(),
        });
    }

    let recomputed = canonical_hash(DOMAIN_SEARCH_REPORT, &bytes);
    let stored = String::from_utf8_lossy(&stored).trim().to_string();
    if recomputed.as_str() != stored {
        return Err(ReportDirError::DigestMismatch {
            stored,
            recomputed: recomputed.as_str().to_string(),
        });
    }

    Ok(PersistedReportV1 {
        bytes,
        value,
        digest: recomputed,
    })
}

/// Write via temp file + rename.
fn write_atomic(path: &Path, content: &[u8]) -> Result<(), ReportDirError> {
    let dir = path.parent().ok_or_else(|| ReportDirError::Io {
        detail: "no parent directory".into(),
    })?;
    let temp_path = dir.join(format!(
        ".tmp_{}",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));
    std::fs::write(&temp_path, content).map_err(|e| ReportDirError::Io {
        detail: format!("write {}: {e}", temp_path.display()),
    })?;
    std::fs::rename(&temp_path, path).map_err(|e| ReportDirError::Io {
        detail: format!("rename {} → {}: {e}", temp_path.display(), path.display()),
    })
}

fn read_required(dir: &Path, filename: &str) -> Result<Vec<u8>, ReportDirError> {
    std::fs::read(dir.join(filename)).map_err(|_| ReportDirError::MissingFile {
        filename: filename.to_string(),
    })
}
