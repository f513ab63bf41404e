//! Search counters.

/// Diagnostics collected during one search. Not used for correctness.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes accepted into the frontier, root included.
    pub generated: u64,
    /// Nodes popped and expanded.
    pub expanded: u64,
    /// Candidates rejected because their novelty exceeded the bound.
    pub pruned_by_bound: u64,
    /// Candidates rejected because an equivalent node was already closed.
    pub pruned_closed: u64,
    /// Candidates rejected because an equivalent node was already queued.
    pub pruned_open: u64,
    /// Deepest node opened, in edges from the root.
    pub max_depth: u32,
    /// Size of the relevant-fluent set.
    pub relevant_fluents: usize,
    /// The root itself was rejected by the pruning pipeline.
    pub root_pruned: bool,
}

impl SearchStats {
    #[must_use]
    pub fn pruned_duplicate(&self) -> u64 {
        self.pruned_closed + self.pruned_open
    }

    /// JSON view for reports. Integers only.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "expanded": self.expanded,
            "generated": self.generated,
            "max_depth": self.max_depth,
            "pruned_by_bound": self.pruned_by_bound,
            "pruned_closed": self.pruned_closed,
            "pruned_open": self.pruned_open,
            "relevant_fluents": self.relevant_fluents,
            "root_pruned": self.root_pruned,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_sum_closed_and_open() {
        let stats = SearchStats {
            pruned_closed: 3,
            pruned_open: 4,
            ..SearchStats::default()
        };
        assert_eq!(stats.pruned_duplicate(), 7);
        let v = stats.to_json_value();
        assert_eq!(v["pruned_open"], 4);
        assert_eq!(v["root_pruned"], false);
    }
}
