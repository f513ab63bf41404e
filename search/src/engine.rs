//! The RP-IW search driver.
//!
//! Breadth-first expansion over a FIFO frontier. Each successor goes through
//! the pruning pipeline in a fixed order:
//!
//! 1. partition: relevant fluents added along the root path
//! 2. closed: an equivalent node was already expanded
//! 3. open: an equivalent node is already queued
//! 4. bound: novelty exceeds the width bound `B`
//!
//! Accepted successors are goal-tested as soon as they are generated.
//!
//! The popped node is closed before its successors are generated. A successor
//! equivalent to its own parent (a self-loop) therefore stops at the closed
//! check and counts as `pruned_closed`, never as `pruned_by_bound`, whatever
//! the bound.
//!
//! # Lifecycle
//!
//! `Idle` → `start()` → `Running` → `do_search()` → one of `Solved`,
//! `Exhausted` or `ContractViolation`. `reset()` returns to `Idle` and frees
//! every node.

use iwplan_kernel::carrier::fluent::{ActionId, FluentId};
use iwplan_kernel::carrier::state::State;
use iwplan_kernel::operators::model::PlanningModel;
use log::{debug, warn};

use crate::error::SearchError;
use crate::frontier::FifoFrontier;
use crate::index::NodeIndex;
use crate::node::{NodeArena, NodeId, SearchNode};
use crate::novelty::{NoveltyEvaluator, NoveltyQuery};
use crate::observer::{NullObserver, SearchObserver};
use crate::partition::PartitionCounter;
use crate::plan::{extract_plan, Plan};
use crate::policy::{validate_bound, ExpansionModeV1, IwPolicyV1};
use crate::relaxed_plan::{RelaxedPlanHeuristic, RelevantFluents};
use crate::stats::SearchStats;

/// A collaborator broke its contract; the search stopped instead of
/// continuing on bad data.
#[derive(Debug, Clone, PartialEq)]
pub enum ContractViolationV1 {
    /// `applicable_actions` returned an action whose precondition fails.
    InapplicableAction { node: NodeId, action: ActionId },
    /// The novelty evaluator returned NaN.
    InvalidNoveltyScore { score: f32 },
    /// A candidate reached the pruning pipeline without a state to score.
    UnmaterializedCandidate { depth: u32 },
}

impl std::fmt::Display for ContractViolationV1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InapplicableAction { node, action } => write!(
                f,
                "model listed {action} as applicable in {node}, precondition fails"
            ),
            Self::InvalidNoveltyScore { score } => {
                write!(f, "novelty evaluator returned {score}")
            }
            Self::UnmaterializedCandidate { depth } => {
                write!(f, "pending node at depth {depth} offered for pruning")
            }
        }
    }
}

/// Where the engine is in its lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineStatus {
    Idle,
    Running,
    Solved { goal: NodeId },
    /// The frontier drained without reaching a goal. Not an error.
    Exhausted,
    ContractViolation(ContractViolationV1),
}

impl EngineStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Solved { .. } => "solved",
            Self::Exhausted => "exhausted",
            Self::ContractViolation(_) => "contract_violation",
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Idle | Self::Running)
    }
}

/// Outcome of the pruning pipeline for one candidate.
#[derive(Debug, Clone, PartialEq)]
enum PruneVerdict {
    Accept,
    Closed,
    Open,
    Bound,
    Invalid(ContractViolationV1),
}

/// Iterative-Width search refined by relaxed-plan partitions.
pub struct RpIwEngine<'m, M, N, H>
where
    M: PlanningModel + ?Sized,
    N: NoveltyEvaluator,
    H: RelaxedPlanHeuristic,
{
    model: &'m M,
    novelty: N,
    heuristic: H,
    policy: IwPolicyV1,
    arena: NodeArena,
    frontier: FifoFrontier,
    closed: NodeIndex,
    open: NodeIndex,
    relevant: RelevantFluents,
    partitions: PartitionCounter,
    stats: SearchStats,
    root: Option<NodeId>,
    status: EngineStatus,
    observer: Box<dyn SearchObserver + 'm>,
}

impl<'m, M, N, H> RpIwEngine<'m, M, N, H>
where
    M: PlanningModel + ?Sized,
    N: NoveltyEvaluator,
    H: RelaxedPlanHeuristic,
{
    /// Create an idle engine.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidBound`] for a NaN or negative bound and
    /// [`SearchError::UnknownFluent`] for an out-of-range goal override.
    pub fn new(
        model: &'m M,
        novelty: N,
        heuristic: H,
        policy: IwPolicyV1,
    ) -> Result<Self, SearchError> {
        policy.validate()?;
        if let Some(goals) = &policy.goal_override {
            check_goals(model, goals)?;
        }
        let num_fluents = model.num_fluents();
        Ok(Self {
            model,
            novelty,
            heuristic,
            closed: NodeIndex::new(policy.closed_equivalence),
            open: NodeIndex::new(policy.open_equivalence),
            policy,
            arena: NodeArena::new(),
            frontier: FifoFrontier::new(),
            relevant: RelevantFluents::new(num_fluents),
            partitions: PartitionCounter::new(num_fluents),
            stats: SearchStats::default(),
            root: None,
            status: EngineStatus::Idle,
            observer: Box::new(NullObserver),
        })
    }

    /// Replace the progress observer.
    #[must_use]
    pub fn with_observer(mut self, observer: impl SearchObserver + 'm) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Change the width bound and reconfigure the evaluator's arity.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidBound`] for a NaN or negative bound.
    pub fn set_bound(&mut self, bound: f32) -> Result<(), SearchError> {
        validate_bound(bound)?;
        self.policy.bound = bound;
        self.novelty.set_arity(bound, self.relevant.len());
        Ok(())
    }

    /// Takes effect at the next `start()`.
    pub fn set_use_relaxed_plan(&mut self, enabled: bool) {
        self.policy.use_relaxed_plan = enabled;
    }

    /// Goal fluents handed to the relaxed-plan heuristic at the next `start()`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::UnknownFluent`] for an out-of-range fluent.
    pub fn set_goals(&mut self, goals: Option<Vec<FluentId>>) -> Result<(), SearchError> {
        if let Some(g) = &goals {
            check_goals(self.model, g)?;
        }
        self.policy.goal_override = goals;
        Ok(())
    }

    /// Free every node and clear the relevant-fluent set and counters.
    pub fn reset(&mut self) {
        self.arena.clear();
        self.frontier.clear();
        self.closed.clear();
        self.open.clear();
        self.relevant.reset_for(self.model.num_fluents());
        self.stats = SearchStats::default();
        self.root = None;
        self.status = EngineStatus::Idle;
    }

    /// Build and enqueue the root from `start` or the model's initial state.
    ///
    /// A root rejected by the pruning pipeline ends the search as
    /// `Exhausted`; that is a result, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::StateShapeMismatch`] if `start` was built for a
    /// different fluent count and [`SearchError::UnknownRelaxedPlanAction`]
    /// if the heuristic names an action the model lacks. The engine is left
    /// `Idle` on error.
    pub fn start(&mut self, start: Option<State>) -> Result<(), SearchError> {
        let expected = self.model.num_fluents();
        let root_state = match start {
            Some(s) if s.num_fluents() != expected => {
                return Err(SearchError::StateShapeMismatch {
                    expected,
                    actual: s.num_fluents(),
                });
            }
            Some(s) => s,
            None => self.model.initial_state(),
        };

        self.reset();
        self.novelty.init(expected);
        if self.policy.use_relaxed_plan {
            self.set_relplan(&root_state)?;
        }
        self.stats.relevant_fluents = self.relevant.len();
        self.novelty.set_arity(self.policy.bound, self.relevant.len());
        self.status = EngineStatus::Running;
        self.observer
            .on_start(self.relevant.as_slice(), self.policy.bound);

        let mut root = SearchNode::root(root_state);
        match self.prune(&mut root) {
            PruneVerdict::Accept => {
                let id = self.arena.push(root);
                self.root = Some(id);
                self.open_node(id);
            }
            PruneVerdict::Invalid(violation) => {
                self.finish(EngineStatus::ContractViolation(violation));
            }
            PruneVerdict::Closed | PruneVerdict::Open | PruneVerdict::Bound => {
                self.stats.root_pruned = true;
                self.observer.on_root_pruned();
                self.finish(EngineStatus::Exhausted);
            }
        }
        Ok(())
    }

    /// Populate the relevant-fluent set from a relaxed plan of `root`.
    fn set_relplan(&mut self, root: &State) -> Result<(), SearchError> {
        let estimate = self
            .heuristic
            .evaluate(root, self.policy.goal_override.as_deref());
        let num_actions = self.model.num_actions();
        if let Some(&action) = estimate.plan.iter().find(|a| a.index() >= num_actions) {
            return Err(SearchError::UnknownRelaxedPlanAction {
                action,
                num_actions,
            });
        }
        self.relevant.extend_from_plan(self.model, &estimate.plan);
        debug!(
            "relaxed plan: {} actions, {} relevant fluents",
            estimate.plan.len(),
            self.relevant.len()
        );
        Ok(())
    }

    /// Run the pruning pipeline on a candidate not yet in the arena.
    fn prune(&mut self, node: &mut SearchNode) -> PruneVerdict {
        let path = node
            .action()
            .into_iter()
            .chain(self.arena.actions_to_root(node.parent()));
        let partition = self.partitions.count(self.model, &self.relevant, path);
        node.assign_partition(partition);

        if self.closed.retrieve(node, &self.arena).is_some() {
            self.stats.pruned_closed += 1;
            debug!("pruned closed: depth={} partition={partition}", node.depth());
            return PruneVerdict::Closed;
        }
        if self.open.retrieve(node, &self.arena).is_some() {
            self.stats.pruned_open += 1;
            debug!("pruned open: depth={} partition={partition}", node.depth());
            return PruneVerdict::Open;
        }

        // Candidates are scored before `into_pending` drops their state.
        let Some(state) = node.state() else {
            return PruneVerdict::Invalid(ContractViolationV1::UnmaterializedCandidate {
                depth: node.depth(),
            });
        };
        let score = self.novelty.evaluate(&NoveltyQuery { state, partition });
        if score.is_nan() {
            return PruneVerdict::Invalid(ContractViolationV1::InvalidNoveltyScore { score });
        }
        if score > self.policy.bound {
            self.stats.pruned_by_bound += 1;
            self.observer.on_pruned_by_bound(score, node.depth());
            return PruneVerdict::Bound;
        }
        node.set_novelty(score);
        PruneVerdict::Accept
    }

    fn open_node(&mut self, id: NodeId) {
        self.frontier.push(id);
        self.open.put(id, &self.arena);
        self.stats.generated += 1;
        let depth = self.arena.get(id).depth();
        if depth > self.stats.max_depth {
            self.stats.max_depth = depth;
            self.observer.on_depth_increase(depth);
        }
    }

    fn finish(&mut self, status: EngineStatus) {
        if let EngineStatus::ContractViolation(v) = &status {
            warn!("search stopped: {v}");
        }
        self.status = status;
        self.observer.on_complete(&self.stats, &self.status);
    }

    fn solved(&mut self, goal: NodeId) -> Option<NodeId> {
        self.finish(EngineStatus::Solved { goal });
        Some(goal)
    }

    /// Expand nodes until a goal is generated or the frontier drains.
    ///
    /// Returns the goal node. Calling it again after termination returns the
    /// same answer without searching; calling it before `start()` returns
    /// `None`.
    pub fn do_search(&mut self) -> Option<NodeId> {
        match self.status {
            EngineStatus::Running => {}
            EngineStatus::Solved { goal } => return Some(goal),
            _ => return None,
        }
        let model = self.model;

        while let Some(head) = self.frontier.pop() {
            self.open.erase(head, &self.arena);
            let was_pending = !self.arena.get(head).is_materialized();
            let state = self.arena.materialize(head, model).clone();

            // A pending node could not be compared by state when it was queued.
            if was_pending && self.closed.retrieve(self.arena.get(head), &self.arena).is_some() {
                self.stats.pruned_closed += 1;
                continue;
            }
            if model.is_goal(&state) {
                return self.solved(head);
            }

            self.closed.put(head, &self.arena);
            self.stats.expanded += 1;

            for action in model.applicable_actions(&state) {
                if !model.is_applicable(&state, action) {
                    self.finish(EngineStatus::ContractViolation(
                        ContractViolationV1::InapplicableAction { node: head, action },
                    ));
                    return None;
                }
                let cost = model.transition_cost(&state, action);
                let next = model.next_state(&state, action);
                let mut child = SearchNode::child(next, head, self.arena.get(head), action, cost);
                match self.prune(&mut child) {
                    PruneVerdict::Accept => {}
                    PruneVerdict::Invalid(violation) => {
                        self.finish(EngineStatus::ContractViolation(violation));
                        return None;
                    }
                    PruneVerdict::Closed | PruneVerdict::Open | PruneVerdict::Bound => continue,
                }
                if self.policy.expansion == ExpansionModeV1::Lazy {
                    child = child.into_pending();
                }
                let id = self.arena.push(child);
                self.open_node(id);
                if self.arena.probe(id, model, |s| model.is_goal(s)) {
                    self.arena.materialize(id, model);
                    return self.solved(id);
                }
            }
        }
        self.finish(EngineStatus::Exhausted);
        None
    }

    /// Search and back-chain the plan from the goal node.
    pub fn find_solution(&mut self) -> Option<Plan> {
        let goal = self.do_search()?;
        Some(extract_plan(&mut self.arena, self.model, goal))
    }

    /// `start(start)` followed by `find_solution()`.
    ///
    /// # Errors
    ///
    /// Propagates pre-flight errors from [`RpIwEngine::start`].
    pub fn solve(&mut self, start: Option<State>) -> Result<Option<Plan>, SearchError> {
        self.start(start)?;
        Ok(self.find_solution())
    }

    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    #[must_use]
    pub fn status(&self) -> &EngineStatus {
        &self.status
    }

    #[must_use]
    pub fn policy(&self) -> &IwPolicyV1 {
        &self.policy
    }

    #[must_use]
    pub fn bound(&self) -> f32 {
        self.policy.bound
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.novelty.arity()
    }

    #[must_use]
    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&SearchNode> {
        self.arena.try_get(id)
    }

    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Relevant fluents in first-seen order.
    #[must_use]
    pub fn relevant_fluents(&self) -> &[FluentId] {
        self.relevant.as_slice()
    }

    #[must_use]
    pub fn closed(&self) -> &NodeIndex {
        &self.closed
    }

    #[must_use]
    pub fn open(&self) -> &NodeIndex {
        &self.open
    }

    #[must_use]
    pub fn frontier(&self) -> &FifoFrontier {
        &self.frontier
    }
}

fn check_goals<M: PlanningModel + ?Sized>(model: &M, goals: &[FluentId]) -> Result<(), SearchError> {
    let num_fluents = model.num_fluents();
    match goals.iter().find(|f| f.index() >= num_fluents) {
        Some(&fluent) => Err(SearchError::UnknownFluent {
            fluent,
            num_fluents,
        }),
        None => Ok(()),
    }
}
