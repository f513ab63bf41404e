//! Partition counting: how many relevant fluents a root path adds.

use iwplan_kernel::carrier::fluent::{ActionId, FluentId};
use iwplan_kernel::carrier::fluent_set::FluentSet;
use iwplan_kernel::operators::model::PlanningModel;

use crate::relaxed_plan::RelevantFluents;

/// Counts each relevant fluent added along a path exactly once.
///
/// The scratch marker set is owned here and needs `&mut self`, so two counts
/// can never interleave on one counter.
#[derive(Debug, Clone, Default)]
pub struct PartitionCounter {
    counted: FluentSet,
    touched: Vec<FluentId>,
}

impl PartitionCounter {
    #[must_use]
    pub fn new(num_fluents: usize) -> Self {
        Self {
            counted: FluentSet::new(num_fluents),
            touched: Vec::new(),
        }
    }

    /// Count relevant fluents added by `actions`, a path walked leaf to root.
    ///
    /// Unconditional and conditional adds count alike. The scratch set is
    /// empty again on return.
    pub fn count<M, I>(&mut self, model: &M, relevant: &RelevantFluents, actions: I) -> u32
    where
        M: PlanningModel + ?Sized,
        I: IntoIterator<Item = ActionId>,
    {
        if relevant.is_empty() {
            return 0;
        }
        if self.counted.capacity() != model.num_fluents() {
            self.counted = FluentSet::new(model.num_fluents());
        }
        let mut partition = 0u32;
        for a in actions {
            for f in model.action(a).possible_adds() {
                if relevant.contains(f) && self.counted.set(f) {
                    self.touched.push(f);
                    partition += 1;
                }
            }
        }
        for f in self.touched.drain(..) {
            self.counted.unset(f);
        }
        partition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iwplan_kernel::operators::task::{ActionSpec, StripsTask, TaskBuilder};

    /// `direct` adds `g1`; `wired` adds `g2` only through a conditional effect;
    /// `stray` adds `noise`, which no relaxed plan below mentions.
    fn task() -> StripsTask {
        let mut b = TaskBuilder::new("partition");
        let on = b.fluent("on").unwrap();
        let g1 = b.fluent("g1").unwrap();
        let g2 = b.fluent("g2").unwrap();
        let noise = b.fluent("noise").unwrap();
        b.action(ActionSpec::new("direct").add([g1]));
        b.action(ActionSpec::new("wired").when([on], [g2], []));
        b.action(ActionSpec::new("stray").add([noise]));
        b.init([on]).goal([g1, g2]);
        b.build().unwrap()
    }

    #[test]
    fn counts_direct_and_conditional_adds_once() {
        let task = task();
        let relevant =
            RelevantFluents::from_relaxed_plan(&task, &[ActionId::new(0), ActionId::new(1)]);
        assert_eq!(relevant.len(), 2);

        let mut counter = PartitionCounter::new(4);
        let path = [ActionId::new(1), ActionId::new(0), ActionId::new(0)];
        assert_eq!(counter.count(&task, &relevant, path), 2);
        assert_eq!(counter.count(&task, &relevant, [ActionId::new(1)]), 1);
        assert_eq!(counter.count(&task, &relevant, []), 0);
    }

    #[test]
    fn adds_outside_the_relaxed_plan_do_not_count() {
        let task = task();
        let relevant =
            RelevantFluents::from_relaxed_plan(&task, &[ActionId::new(0), ActionId::new(1)]);
        assert!(!relevant.contains(FluentId::new(3)));

        let mut counter = PartitionCounter::new(4);
        let path = [ActionId::new(2), ActionId::new(0), ActionId::new(2)];
        assert_eq!(counter.count(&task, &relevant, path), 1);
        assert_eq!(counter.count(&task, &relevant, [ActionId::new(2)]), 0);
    }

    #[test]
    fn empty_relevant_set_counts_zero() {
        let task = task();
        let relevant = RelevantFluents::new(4);
        let mut counter = PartitionCounter::default();
        assert_eq!(counter.count(&task, &relevant, [ActionId::new(0)]), 0);
    }
}
