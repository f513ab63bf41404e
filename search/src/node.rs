//! Search nodes, the arena that owns them, and node equivalence.
//!
//! Every accepted node lives in a [`NodeArena`] and is addressed by a
//! [`NodeId`]. Parent links are ids, never references, so the frontier, the
//! closed set and the open index can all refer to the same node without
//! sharing ownership.

use iwplan_kernel::carrier::fluent::{ActionId, Cost};
use iwplan_kernel::carrier::state::State;
use iwplan_kernel::operators::model::PlanningModel;

/// Dense index of a node in its [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Whether a node carries its state.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeBody {
    Materialized(State),
    /// State is `action` applied to the parent's state; rebuilt on demand.
    Pending,
}

/// A node of the generated search tree.
#[derive(Debug, Clone)]
pub struct SearchNode {
    body: NodeBody,
    parent: Option<NodeId>,
    action: Option<ActionId>,
    g: Cost,
    depth: u32,
    partition: u32,
    partition_assigned: bool,
    novelty: Option<f32>,
    hash: u64,
}

impl SearchNode {
    /// The root: materialized, no parent, no generating action.
    #[must_use]
    pub fn root(state: State) -> Self {
        let hash = state.bucket_hash();
        Self {
            body: NodeBody::Materialized(state),
            parent: None,
            action: None,
            g: 0.0,
            depth: 0,
            partition: 0,
            partition_assigned: false,
            novelty: None,
            hash,
        }
    }

    /// A materialized successor of `parent` (stored at `parent_id`).
    ///
    /// `g = parent.g + cost`.
    #[must_use]
    pub fn child(
        state: State,
        parent_id: NodeId,
        parent: &SearchNode,
        action: ActionId,
        cost: Cost,
    ) -> Self {
        let hash = state.bucket_hash();
        Self {
            body: NodeBody::Materialized(state),
            parent: Some(parent_id),
            action: Some(action),
            g: parent.g + cost,
            depth: parent.depth + 1,
            partition: 0,
            partition_assigned: false,
            novelty: None,
            hash,
        }
    }

    /// Drop the state, keeping the hash it produced.
    ///
    /// Parentless nodes are returned unchanged: their state cannot be rebuilt.
    #[must_use]
    pub fn into_pending(mut self) -> Self {
        if self.parent.is_some() && self.action.is_some() {
            self.body = NodeBody::Pending;
        }
        self
    }

    #[must_use]
    pub fn body(&self) -> &NodeBody {
        &self.body
    }

    #[must_use]
    pub fn state(&self) -> Option<&State> {
        match &self.body {
            NodeBody::Materialized(s) => Some(s),
            NodeBody::Pending => None,
        }
    }

    #[must_use]
    pub fn is_materialized(&self) -> bool {
        matches!(self.body, NodeBody::Materialized(_))
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Generating action; `None` only for the root.
    #[must_use]
    pub fn action(&self) -> Option<ActionId> {
        self.action
    }

    /// Accumulated path cost from the root.
    #[must_use]
    pub fn g(&self) -> Cost {
        self.g
    }

    /// Number of edges from the root.
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[must_use]
    pub fn partition(&self) -> u32 {
        self.partition
    }

    /// Set the partition count. Assigned once, before the pruning decision.
    pub fn assign_partition(&mut self, partition: u32) {
        debug_assert!(
            !self.partition_assigned,
            "partition assigned twice for the same node"
        );
        self.partition = partition;
        self.partition_assigned = true;
    }

    /// Novelty score the node was accepted with.
    #[must_use]
    pub fn novelty(&self) -> Option<f32> {
        self.novelty
    }

    pub(crate) fn set_novelty(&mut self, score: f32) {
        self.novelty = Some(score);
    }

    /// Bucket hash of the node's logical state (identical for both bodies).
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }
}

/// Which node fields decide duplicate status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeEquivalenceV1 {
    /// Equal states are duplicates regardless of partition.
    StateOnly,
    /// Equal states are duplicates only with equal partitions.
    StateAndPartition,
}

impl NodeEquivalenceV1 {
    /// Decide whether `a` and `b` denote the same search node.
    ///
    /// When either node is pending, falls back to "same generating action
    /// applied to equal parent states"; two parentless nodes are equivalent.
    #[must_use]
    pub fn equivalent(self, a: &SearchNode, b: &SearchNode, arena: &NodeArena) -> bool {
        if self == Self::StateAndPartition && a.partition != b.partition {
            return false;
        }
        if let (Some(sa), Some(sb)) = (a.state(), b.state()) {
            return sa == sb;
        }
        match (a.parent, b.parent) {
            (None, None) => true,
            (Some(pa), Some(pb)) => {
                a.action == b.action
                    && match (arena.state(pa), arena.state(pb)) {
                        (Some(x), Some(y)) => x == y,
                        _ => pa == pb,
                    }
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StateOnly => "state_only",
            Self::StateAndPartition => "state_and_partition",
        }
    }
}

/// Owner of every node accepted during one search.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<SearchNode>,
}

impl NodeArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: SearchNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// # Panics
    ///
    /// Panics if `id` was not issued by this arena since the last `clear`.
    #[must_use]
    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }

    #[must_use]
    pub fn try_get(&self, id: NodeId) -> Option<&SearchNode> {
        self.nodes.get(id.0)
    }

    #[must_use]
    pub fn state(&self, id: NodeId) -> Option<&State> {
        self.nodes.get(id.0).and_then(SearchNode::state)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SearchNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Generating actions from `from` up to (excluding) the root.
    pub fn actions_to_root(&self, from: Option<NodeId>) -> impl Iterator<Item = ActionId> + '_ {
        let mut cursor = from;
        std::iter::from_fn(move || loop {
            let node = self.nodes.get(cursor?.0)?;
            cursor = node.parent;
            if let Some(a) = node.action {
                return Some(a);
            }
        })
    }

    /// Node ids from the root down to `to`, inclusive.
    #[must_use]
    pub fn path(&self, to: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut cursor = Some(to);
        while let Some(id) = cursor {
            path.push(id);
            cursor = self.nodes.get(id.0).and_then(|n| n.parent);
        }
        path.reverse();
        path
    }

    /// Materialize `id` (and any pending ancestors) and return its state.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this arena.
    pub fn materialize<M: PlanningModel + ?Sized>(&mut self, id: NodeId, model: &M) -> &State {
        let mut chain = Vec::new();
        let mut cursor = id;
        while !self.nodes[cursor.0].is_materialized() {
            chain.push(cursor);
            match self.nodes[cursor.0].parent {
                Some(p) => cursor = p,
                None => break,
            }
        }
        for pending in chain.into_iter().rev() {
            let node = &self.nodes[pending.0];
            let (Some(parent), Some(action)) = (node.parent, node.action) else {
                continue;
            };
            let next = match self.nodes[parent.0].state() {
                Some(ps) => model.next_state(ps, action),
                None => continue,
            };
            self.nodes[pending.0].body = NodeBody::Materialized(next);
        }
        match &self.nodes[id.0].body {
            NodeBody::Materialized(s) => s,
            NodeBody::Pending => unreachable!("into_pending never strips a parentless node"),
        }
    }

    /// Run `probe` on the logical state of `id` without storing it.
    ///
    /// A pending node is probed by progressing its parent's state in place
    /// and regressing it afterwards.
    pub fn probe<M, R>(&mut self, id: NodeId, model: &M, probe: impl FnOnce(&State) -> R) -> R
    where
        M: PlanningModel + ?Sized,
    {
        let node = &self.nodes[id.0];
        if let NodeBody::Materialized(s) = &node.body {
            return probe(s);
        }
        let (parent, action) = match (node.parent, node.action) {
            (Some(p), Some(a)) => (p, a),
            _ => return probe(self.materialize(id, model)),
        };
        self.materialize(parent, model);
        if let NodeBody::Materialized(ps) = &mut self.nodes[parent.0].body {
            let undo = model.progress(ps, action);
            let out = probe(ps);
            model.regress(ps, action, undo);
            return out;
        }
        probe(self.materialize(id, model))
    }
}
