//! Progress hooks called by the engine at fixed points of a search.

use iwplan_kernel::carrier::fluent::FluentId;
use log::{debug, info, warn};

use crate::engine::EngineStatus;
use crate::stats::SearchStats;

/// Receives search progress. Every method defaults to a no-op.
pub trait SearchObserver {
    /// After the relevant-fluent set is built and the arity configured.
    fn on_start(&mut self, _relevant: &[FluentId], _bound: f32) {}

    /// The root was rejected; the search ends immediately.
    fn on_root_pruned(&mut self) {}

    /// A node deeper than every previous one was opened.
    fn on_depth_increase(&mut self, _depth: u32) {}

    /// A candidate was rejected because its novelty exceeded the bound.
    fn on_pruned_by_bound(&mut self, _novelty: f32, _depth: u32) {}

    /// The search reached a terminal status.
    fn on_complete(&mut self, _stats: &SearchStats, _status: &EngineStatus) {}
}

impl<T: SearchObserver + ?Sized> SearchObserver for &mut T {
    fn on_start(&mut self, relevant: &[FluentId], bound: f32) {
        (**self).on_start(relevant, bound);
    }

    fn on_root_pruned(&mut self) {
        (**self).on_root_pruned();
    }

    fn on_depth_increase(&mut self, depth: u32) {
        (**self).on_depth_increase(depth);
    }

    fn on_pruned_by_bound(&mut self, novelty: f32, depth: u32) {
        (**self).on_pruned_by_bound(novelty, depth);
    }

    fn on_complete(&mut self, stats: &SearchStats, status: &EngineStatus) {
        (**self).on_complete(stats, status);
    }
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl SearchObserver for NullObserver {}

/// Observer that forwards progress to the `log` facade.
#[derive(Debug, Clone, Default)]
pub struct LogObserver {
    label: String,
}

impl LogObserver {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl SearchObserver for LogObserver {
    fn on_start(&mut self, relevant: &[FluentId], bound: f32) {
        info!(
            "[{}] start: bound={bound} relevant_fluents={}",
            self.label,
            relevant.len()
        );
    }

    fn on_root_pruned(&mut self) {
        info!("[{}] initial state pruned", self.label);
    }

    fn on_depth_increase(&mut self, depth: u32) {
        info!("[{}] depth {depth}", self.label);
    }

    fn on_pruned_by_bound(&mut self, novelty: f32, depth: u32) {
        debug!(
            "[{}] pruned by bound: novelty={novelty} depth={depth}",
            self.label
        );
    }

    fn on_complete(&mut self, stats: &SearchStats, status: &EngineStatus) {
        match status {
            EngineStatus::ContractViolation(v) => {
                warn!("[{}] stopped on contract violation: {v}", self.label);
            }
            _ => info!(
                "[{}] {}: generated={} expanded={} pruned_by_bound={} pruned_duplicate={}",
                self.label,
                status.as_str(),
                stats.generated,
                stats.expanded,
                stats.pruned_by_bound,
                stats.pruned_duplicate()
            ),
        }
    }
}

/// Observer that records events in memory. Useful in tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingObserver {
    pub depths: Vec<u32>,
    pub pruned_by_bound: Vec<f32>,
    pub root_pruned: bool,
    pub completed: bool,
}

impl SearchObserver for RecordingObserver {
    fn on_root_pruned(&mut self) {
        self.root_pruned = true;
    }

    fn on_depth_increase(&mut self, depth: u32) {
        self.depths.push(depth);
    }

    fn on_pruned_by_bound(&mut self, novelty: f32, _depth: u32) {
        self.pruned_by_bound.push(novelty);
    }

    fn on_complete(&mut self, _stats: &SearchStats, _status: &EngineStatus) {
        self.completed = true;
    }
}
