//! Canonical hashing types, domain separation constants and content
//! addresses for states and tasks.
//!
//! Algorithm: SHA-256 for all V1 artifacts. Every hash is domain separated
//! by a null-terminated prefix so equal bytes in different roles never
//! collide.

use sha2::{Digest, Sha256};

use crate::carrier::fluent::Cost;
use crate::carrier::state::State;
use crate::operators::model::PlanningModel;
use crate::operators::task::StripsTask;
use crate::proof::canon::{canonical_json_bytes, CanonError};

/// A content-addressed hash with algorithm identifier.
///
/// Format: `"algorithm:hex_digest"` (e.g., `"sha256:abcdef..."`)
///
/// Invariant: the inner string always contains exactly one `:` separator,
/// with non-empty substrings on both sides (enforced by [`ContentHash::parse`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash {
    full: String,
    colon: usize,
}

impl ContentHash {
    /// Parse from `"algorithm:hex"` format.
    ///
    /// Returns `None` if the format is invalid (missing colon,
    /// empty algorithm, or empty digest).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let colon = s.find(':')?;
        if colon == 0 || colon == s.len() - 1 || s[colon + 1..].contains(':') {
            return None;
        }
        Some(Self {
            full: s.to_string(),
            colon,
        })
    }

    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.full[..self.colon]
    }

    #[must_use]
    pub fn hex_digest(&self) -> &str {
        &self.full[self.colon + 1..]
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.full
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full)
    }
}

/// Domain prefix for state fingerprints.
pub const DOMAIN_STATE: &[u8] = b"IWPLAN::STATE::V1\0";

/// Domain prefix for task digests.
pub const DOMAIN_TASK: &[u8] = b"IWPLAN::TASK::V1\0";

/// Domain prefix for search report digests.
pub const DOMAIN_SEARCH_REPORT: &[u8] = b"IWPLAN::SEARCH_REPORT::V1\0";

/// Compute the canonical hash of a byte slice with domain separation.
///
/// Result format: `"sha256:<hex_digest>"`.
#[must_use]
pub fn canonical_hash(domain: &[u8], data: &[u8]) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    hasher.update(data);
    let digest = hex::encode(hasher.finalize());
    let full = format!("sha256:{digest}");
    ContentHash {
        colon: "sha256".len(),
        full,
    }
}

/// Content address of a state's fluent signature.
#[must_use]
pub fn state_fingerprint(state: &State) -> ContentHash {
    canonical_hash(DOMAIN_STATE, &state.signature_bytes())
}

/// Render a cost for canonical JSON (which admits integers only).
#[must_use]
pub fn cost_to_string(cost: Cost) -> String {
    format!("{cost:.3}")
}

/// Canonical JSON view of a task: names, fluent lists and costs.
#[must_use]
pub fn task_to_json(task: &StripsTask) -> serde_json::Value {
    let ids = |list: &[crate::carrier::fluent::FluentId]| -> Vec<u32> {
        list.iter().map(|f| f.raw()).collect()
    };
    let actions: Vec<serde_json::Value> = task
        .actions()
        .iter()
        .map(|a| {
            serde_json::json!({
                "add": ids(a.add()),
                "conditional_effects": a.conditional_effects().iter().map(|ce| serde_json::json!({
                    "add": ids(&ce.add),
                    "condition": ids(&ce.condition),
                    "delete": ids(&ce.delete),
                })).collect::<Vec<_>>(),
                "cost": cost_to_string(a.cost()),
                "delete": ids(a.delete()),
                "name": a.name(),
                "precondition": ids(a.precondition()),
            })
        })
        .collect();
    serde_json::json!({
        "actions": actions,
        "fluents": task.fluent_names(),
        "goal": ids(task.goal_fluents()),
        "init": ids(task.init()),
        "name": task.name(),
    })
}

/// Content address of a task.
///
/// # Errors
///
/// Returns [`CanonError`] if canonical serialization fails.
pub fn task_digest(task: &StripsTask) -> Result<ContentHash, CanonError> {
    let bytes = canonical_json_bytes(&task_to_json(task))?;
    Ok(canonical_hash(DOMAIN_TASK, &bytes))
}
