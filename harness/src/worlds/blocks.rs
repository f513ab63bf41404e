//! Blocks world: the classic four-operator encoding.
//!
//! Fluents: `on(x,y)`, `ontable(x)`, `clear(x)`, `holding(x)`, `handempty`.
//! Operators: `pick-up(x)`, `put-down(x)`, `stack(x,y)`, `unstack(x,y)`.
//!
//! Towers are listed bottom first. The goal asks for every `on(x,y)` of the
//! goal towers, plus `ontable(x)` for single-block towers.

use std::collections::BTreeSet;

use iwplan_kernel::carrier::fluent::{ActionId, FluentId};
use iwplan_kernel::operators::task::{ActionSpec, StripsTask, TaskBuilder};

use crate::contract::{PlanningWorldV1, WorldError};
use crate::worlds::actions_named;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlocksWorld {
    id: String,
    initial: Vec<Vec<String>>,
    goal: Vec<Vec<String>>,
}

impl BlocksWorld {
    #[must_use]
    pub fn new(id: impl Into<String>, initial: &[&[&str]], goal: &[&[&str]]) -> Self {
        let own = |towers: &[&[&str]]| -> Vec<Vec<String>> {
            towers
                .iter()
                .map(|t| t.iter().map(|b| (*b).to_string()).collect())
                .collect()
        };
        Self {
            id: id.into(),
            initial: own(initial),
            goal: own(goal),
        }
    }

    /// Sussman anomaly: `C` on `A`, `B` on the table; goal `A` on `B` on `C`.
    #[must_use]
    pub fn sussman() -> Self {
        Self::new("blocks_sussman", &[&["a", "c"], &["b"]], &[&["c", "b", "a"]])
    }

    /// `n` blocks on the table, to be stacked into one tower (`b0` at the bottom).
    #[must_use]
    pub fn tower(n: usize) -> Self {
        let names: Vec<String> = (0..n).map(|i| format!("b{i}")).collect();
        Self {
            id: format!("blocks_tower_{n}"),
            initial: names.iter().map(|b| vec![b.clone()]).collect(),
            goal: vec![names],
        }
    }

    fn blocks(&self) -> Result<Vec<String>, WorldError> {
        let mut seen = BTreeSet::new();
        for b in self.initial.iter().flatten() {
            if !seen.insert(b.clone()) {
                return Err(WorldError::InvalidParameters {
                    detail: format!("block {b} appears twice in the initial towers"),
                });
            }
        }
        let mut goal_blocks = BTreeSet::new();
        for b in self.goal.iter().flatten() {
            if !goal_blocks.insert(b.clone()) {
                return Err(WorldError::InvalidParameters {
                    detail: format!("block {b} appears twice in the goal towers"),
                });
            }
            if !seen.contains(b) {
                return Err(WorldError::InvalidParameters {
                    detail: format!("goal block {b} is not in the initial towers"),
                });
            }
        }
        Ok(seen.into_iter().collect())
    }
}

fn on(x: &str, y: &str) -> String {
    format!("on({x},{y})")
}

/// Fluent ids of one world, looked up by name during encoding.
struct Names<'a> {
    builder: &'a TaskBuilder,
}

impl Names<'_> {
    fn get(&self, name: &str) -> Result<FluentId, WorldError> {
        self.builder
            .fluent_id(name)
            .ok_or_else(|| WorldError::TaskBuildFailed {
                detail: format!("fluent {name} was not declared"),
            })
    }
}

impl PlanningWorldV1 for BlocksWorld {
    fn world_id(&self) -> &str {
        &self.id
    }

    fn build_task(&self) -> Result<StripsTask, WorldError> {
        let blocks = self.blocks()?;
        let mut b = TaskBuilder::new(self.id.clone());

        b.fluent("handempty")?;
        for x in &blocks {
            b.fluent(format!("ontable({x})"))?;
            b.fluent(format!("clear({x})"))?;
            b.fluent(format!("holding({x})"))?;
        }
        for x in &blocks {
            for y in blocks.iter().filter(|y| *y != x) {
                b.fluent(on(x, y))?;
            }
        }

        let mut specs = Vec::new();
        let mut init = Vec::new();
        let mut goal = Vec::new();
        {
            let n = Names { builder: &b };
            let hand = n.get("handempty")?;
            for x in &blocks {
                let ontable = n.get(&format!("ontable({x})"))?;
                let clear = n.get(&format!("clear({x})"))?;
                let holding = n.get(&format!("holding({x})"))?;
                specs.push(
                    ActionSpec::new(format!("pick-up({x})"))
                        .pre([clear, ontable, hand])
                        .add([holding])
                        .del([clear, ontable, hand]),
                );
                specs.push(
                    ActionSpec::new(format!("put-down({x})"))
                        .pre([holding])
                        .add([clear, ontable, hand])
                        .del([holding]),
                );
                for y in blocks.iter().filter(|y| *y != x) {
                    let on_xy = n.get(&on(x, y))?;
                    let clear_y = n.get(&format!("clear({y})"))?;
                    specs.push(
                        ActionSpec::new(format!("stack({x},{y})"))
                            .pre([holding, clear_y])
                            .add([on_xy, clear, hand])
                            .del([holding, clear_y]),
                    );
                    specs.push(
                        ActionSpec::new(format!("unstack({x},{y})"))
                            .pre([on_xy, clear, hand])
                            .add([holding, clear_y])
                            .del([on_xy, clear, hand]),
                    );
                }
            }

            init.push(hand);
            for tower in &self.initial {
                if let (Some(bottom), Some(top)) = (tower.first(), tower.last()) {
                    init.push(n.get(&format!("ontable({bottom})"))?);
                    init.push(n.get(&format!("clear({top})"))?);
                }
                for w in tower.windows(2) {
                    init.push(n.get(&on(&w[1], &w[0]))?);
                }
            }
            for tower in &self.goal {
                if let [single] = tower.as_slice() {
                    goal.push(n.get(&format!("ontable({single})"))?);
                }
                for w in tower.windows(2) {
                    goal.push(n.get(&on(&w[1], &w[0]))?);
                }
            }
        }

        for spec in specs {
            b.action(spec);
        }
        b.init(init).goal(goal);
        Ok(b.build()?)
    }

    /// Achievers of the goal `on` atoms, bottom-up per goal tower.
    fn relaxed_plan_hint(&self, task: &StripsTask) -> Vec<ActionId> {
        let mut names = Vec::new();
        for tower in &self.goal {
            for w in tower.windows(2) {
                names.push(format!("stack({},{})", w[1], w[0]));
            }
        }
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        actions_named(task, &refs)
    }
}
