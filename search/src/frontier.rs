//! FIFO frontier for breadth-first width search.

use std::collections::VecDeque;

use crate::node::NodeId;

/// First-in first-out queue of node ids.
///
/// Nodes are expanded in generation order, so depth never decreases along
/// the pop sequence.
#[derive(Debug, Default)]
pub struct FifoFrontier {
    queue: VecDeque<NodeId>,
    high_water: usize,
}

impl FifoFrontier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: NodeId) {
        self.queue.push_back(id);
        self.high_water = self.high_water.max(self.queue.len());
    }

    pub fn pop(&mut self) -> Option<NodeId> {
        self.queue.pop_front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Largest size the queue reached since the last `clear`.
    #[must_use]
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.high_water = 0;
    }
}
