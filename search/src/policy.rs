//! Search policy types.

use iwplan_kernel::carrier::fluent::FluentId;

use crate::error::SearchError;
use crate::node::NodeEquivalenceV1;

/// Width bound, relaxed-plan usage and duplicate-detection configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct IwPolicyV1 {
    /// Novelty bound `B`. Nodes whose novelty exceeds it are pruned.
    /// `f32::INFINITY` disables width pruning.
    pub bound: f32,
    /// Build the relevant-fluent set from a relaxed plan at `start()`.
    pub use_relaxed_plan: bool,
    /// Goal fluents handed to the relaxed-plan heuristic instead of the
    /// model's goal. Does not change the goal test.
    pub goal_override: Option<Vec<FluentId>>,
    /// Whether accepted successors keep their state.
    pub expansion: ExpansionModeV1,
    /// Comparator for closed-set lookups.
    pub closed_equivalence: NodeEquivalenceV1,
    /// Comparator for open-membership lookups.
    pub open_equivalence: NodeEquivalenceV1,
}

impl IwPolicyV1 {
    /// Policy with the given bound and defaults otherwise.
    #[must_use]
    pub fn with_bound(bound: f32) -> Self {
        Self {
            bound,
            ..Self::default()
        }
    }

    /// Validate that the policy can drive a search.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidBound`] if the bound is NaN or negative.
    pub fn validate(&self) -> Result<(), SearchError> {
        validate_bound(self.bound)
    }
}

pub(crate) fn validate_bound(bound: f32) -> Result<(), SearchError> {
    if bound.is_nan() || bound < 0.0 {
        return Err(SearchError::InvalidBound { bound });
    }
    Ok(())
}

impl Default for IwPolicyV1 {
    fn default() -> Self {
        Self {
            bound: f32::INFINITY,
            use_relaxed_plan: true,
            goal_override: None,
            expansion: ExpansionModeV1::Eager,
            closed_equivalence: NodeEquivalenceV1::StateAndPartition,
            open_equivalence: NodeEquivalenceV1::StateAndPartition,
        }
    }
}

/// When a successor's state is built and kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionModeV1 {
    /// Accepted successors keep their materialized state. Default.
    Eager,
    /// Accepted successors store only `(parent, action)`; the state is
    /// rebuilt when the node is dequeued.
    Lazy,
}
