//! Novelty evaluation: the width oracle behind IW(B).
//!
//! The novelty of a state is the size of the smallest fluent tuple in it
//! that no previously evaluated state (in the same partition) contained.
//! The engine prunes a node whose novelty exceeds the configured bound.

use std::collections::HashSet;

use iwplan_kernel::carrier::fluent::FluentId;
use iwplan_kernel::carrier::fluent_set::FluentSet;
use iwplan_kernel::carrier::state::State;

/// Largest tuple size tracked by [`PartitionedNovelty`].
pub const MAX_ARITY: usize = 2;

/// What the novelty evaluator sees of a candidate node.
#[derive(Debug, Clone, Copy)]
pub struct NoveltyQuery<'a> {
    pub state: &'a State,
    pub partition: u32,
}

/// Width oracle consumed by the engine.
///
/// # Contract
///
/// - `evaluate` returns a non-NaN score; the engine treats NaN as a
///   contract violation.
/// - `init` forgets every recorded tuple and sizes the evaluator for the
///   model the engine searches, whatever it was constructed with.
pub trait NoveltyEvaluator {
    /// Forget all recorded tuples and track `num_fluents` fluents.
    fn init(&mut self, num_fluents: usize);

    /// Configure the tuple size from the bound and the relevant-fluent count.
    fn set_arity(&mut self, bound: f32, relevant_fluents: usize);

    fn arity(&self) -> usize;

    /// Score the query and record its tuples.
    fn evaluate(&mut self, query: &NoveltyQuery<'_>) -> f32;
}

/// Seen tuples of one partition.
#[derive(Debug, Clone, Default)]
struct TupleTable {
    singles: FluentSet,
    pairs: HashSet<(FluentId, FluentId)>,
}

/// Tuple novelty with one table per partition value.
///
/// Two states reached with different partition counts never make each other
/// stale, so progress along the relaxed plan reopens the width budget.
#[derive(Debug, Clone)]
pub struct PartitionedNovelty {
    num_fluents: usize,
    arity: usize,
    tables: Vec<TupleTable>,
}

impl PartitionedNovelty {
    #[must_use]
    pub fn new(num_fluents: usize) -> Self {
        Self {
            num_fluents,
            arity: MAX_ARITY,
            tables: Vec::new(),
        }
    }

    /// Number of partition tables currently allocated.
    #[must_use]
    pub fn partitions(&self) -> usize {
        self.tables.len()
    }

    fn table(&mut self, partition: u32) -> &mut TupleTable {
        let idx = partition as usize;
        if idx >= self.tables.len() {
            let fresh = TupleTable {
                singles: FluentSet::new(self.num_fluents),
                pairs: HashSet::new(),
            };
            self.tables.resize(idx + 1, fresh);
        }
        &mut self.tables[idx]
    }
}

/// `min(floor(bound), MAX_ARITY)`; infinite bound gives `MAX_ARITY`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn arity_for_bound(bound: f32) -> usize {
    if bound.is_nan() || bound < 0.0 {
        0
    } else if bound.is_infinite() || bound >= MAX_ARITY as f32 {
        MAX_ARITY
    } else {
        bound.floor() as usize
    }
}

impl NoveltyEvaluator for PartitionedNovelty {
    fn init(&mut self, num_fluents: usize) {
        self.num_fluents = num_fluents;
        self.tables.clear();
    }

    fn set_arity(&mut self, bound: f32, relevant_fluents: usize) {
        self.arity = arity_for_bound(bound);
        let wanted = u32::try_from(relevant_fluents).unwrap_or(u32::MAX);
        self.table(wanted);
    }

    fn arity(&self) -> usize {
        self.arity
    }

    #[allow(clippy::cast_precision_loss)]
    fn evaluate(&mut self, query: &NoveltyQuery<'_>) -> f32 {
        let arity = self.arity;
        let fluents = query.state.fluents();
        let table = self.table(query.partition);
        let mut novelty = arity + 1;

        if arity >= 1 {
            for &f in fluents {
                if table.singles.set(f) {
                    novelty = 1;
                }
            }
        }
        if arity >= 2 {
            for (i, &a) in fluents.iter().enumerate() {
                for &b in &fluents[i + 1..] {
                    if table.pairs.insert((a, b)) && novelty > 2 {
                        novelty = 2;
                    }
                }
            }
        }
        novelty as f32
    }
}
