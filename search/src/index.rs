//! `NodeIndex`: hashed node set used for the closed list and for open
//! membership.
//!
//! Buckets are keyed by [`SearchNode::hash`]; collisions are resolved with
//! the index's [`NodeEquivalenceV1`]. A `BTreeMap` keeps iteration order
//! independent of hasher state.

use std::collections::BTreeMap;

use crate::node::{NodeArena, NodeEquivalenceV1, NodeId, SearchNode};

#[derive(Debug)]
pub struct NodeIndex {
    buckets: BTreeMap<u64, Vec<NodeId>>,
    equivalence: NodeEquivalenceV1,
    len: usize,
}

impl NodeIndex {
    #[must_use]
    pub fn new(equivalence: NodeEquivalenceV1) -> Self {
        Self {
            buckets: BTreeMap::new(),
            equivalence,
            len: 0,
        }
    }

    #[must_use]
    pub fn equivalence(&self) -> NodeEquivalenceV1 {
        self.equivalence
    }

    /// Insert `id`. Re-inserting an id already present is a no-op.
    pub fn put(&mut self, id: NodeId, arena: &NodeArena) {
        let bucket = self.buckets.entry(arena.get(id).hash()).or_default();
        if !bucket.contains(&id) {
            bucket.push(id);
            self.len += 1;
        }
    }

    /// Find a stored node equivalent to `candidate`.
    #[must_use]
    pub fn retrieve(&self, candidate: &SearchNode, arena: &NodeArena) -> Option<NodeId> {
        self.buckets.get(&candidate.hash())?.iter().copied().find(|&id| {
            self.equivalence
                .equivalent(arena.get(id), candidate, arena)
        })
    }

    /// Remove `id` itself (not an equivalent node). Returns whether it was present.
    pub fn erase(&mut self, id: NodeId, arena: &NodeArena) -> bool {
        let hash = arena.get(id).hash();
        let Some(bucket) = self.buckets.get_mut(&hash) else {
            return false;
        };
        let Some(pos) = bucket.iter().position(|&x| x == id) else {
            return false;
        };
        bucket.swap_remove(pos);
        if bucket.is_empty() {
            self.buckets.remove(&hash);
        }
        self.len -= 1;
        true
    }

    #[must_use]
    pub fn contains(&self, id: NodeId, arena: &NodeArena) -> bool {
        self.buckets
            .get(&arena.get(id).hash())
            .is_some_and(|b| b.contains(&id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
        self.len = 0;
    }

    /// Stored ids, grouped by bucket in ascending hash order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.buckets.values().flatten().copied()
    }
}
