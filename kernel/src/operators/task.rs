//! STRIPS tasks with conditional effects, and their validating builder.

use std::collections::HashMap;

use crate::carrier::fluent::{ActionId, Cost, FluentId};
use crate::carrier::state::State;
use crate::operators::action::{Action, ConditionalEffect};

/// Typed failure for task construction.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskError {
    /// A fluent or action name was empty.
    EmptyName { kind: &'static str },
    /// A fluent name was declared twice.
    DuplicateFluent { name: String },
    /// A fluent id does not refer to a declared fluent.
    UnknownFluent { context: String, fluent: FluentId },
    /// An action cost was negative or not finite.
    InvalidCost { action: String, cost: Cost },
    /// More fluents or actions than fit in a `u32` index.
    TooLarge { kind: &'static str },
}

impl std::fmt::Display for TaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName { kind } => write!(f, "empty {kind} name"),
            Self::DuplicateFluent { name } => write!(f, "duplicate fluent: {name}"),
            Self::UnknownFluent { context, fluent } => {
                write!(f, "unknown fluent {fluent} in {context}")
            }
            Self::InvalidCost { action, cost } => {
                write!(f, "invalid cost {cost} for action {action}")
            }
            Self::TooLarge { kind } => write!(f, "too many {kind}s for u32 indexing"),
        }
    }
}

impl std::error::Error for TaskError {}

/// Declarative description of an action, resolved by [`TaskBuilder::build`].
#[derive(Debug, Clone, PartialEq)]
pub struct ActionSpec {
    name: String,
    precondition: Vec<FluentId>,
    add: Vec<FluentId>,
    delete: Vec<FluentId>,
    conditional_effects: Vec<ConditionalEffect>,
    cost: Cost,
}

impl ActionSpec {
    /// New action with unit cost and no effects.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            precondition: Vec::new(),
            add: Vec::new(),
            delete: Vec::new(),
            conditional_effects: Vec::new(),
            cost: 1.0,
        }
    }

    #[must_use]
    pub fn pre(mut self, fluents: impl IntoIterator<Item = FluentId>) -> Self {
        self.precondition.extend(fluents);
        self
    }

    #[must_use]
    pub fn add(mut self, fluents: impl IntoIterator<Item = FluentId>) -> Self {
        self.add.extend(fluents);
        self
    }

    #[must_use]
    pub fn del(mut self, fluents: impl IntoIterator<Item = FluentId>) -> Self {
        self.delete.extend(fluents);
        self
    }

    /// Add a conditional effect `when condition: add, delete`.
    #[must_use]
    pub fn when(
        mut self,
        condition: impl IntoIterator<Item = FluentId>,
        add: impl IntoIterator<Item = FluentId>,
        delete: impl IntoIterator<Item = FluentId>,
    ) -> Self {
        self.conditional_effects.push(ConditionalEffect {
            condition: condition.into_iter().collect(),
            add: add.into_iter().collect(),
            delete: delete.into_iter().collect(),
        });
        self
    }

    #[must_use]
    pub fn cost(mut self, cost: Cost) -> Self {
        self.cost = cost;
        self
    }
}

/// Incremental, validating constructor for [`StripsTask`].
#[derive(Debug, Clone, Default)]
pub struct TaskBuilder {
    name: String,
    fluents: Vec<String>,
    by_name: HashMap<String, FluentId>,
    actions: Vec<ActionSpec>,
    init: Vec<FluentId>,
    goal: Vec<FluentId>,
}

impl TaskBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Declare a fluent.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::DuplicateFluent`] if `name` is already declared,
    /// [`TaskError::EmptyName`] if it is empty.
    pub fn fluent(&mut self, name: impl Into<String>) -> Result<FluentId, TaskError> {
        let name = name.into();
        if name.is_empty() {
            return Err(TaskError::EmptyName { kind: "fluent" });
        }
        if self.by_name.contains_key(&name) {
            return Err(TaskError::DuplicateFluent { name });
        }
        let id = FluentId::from_index(self.fluents.len())
            .ok_or(TaskError::TooLarge { kind: "fluent" })?;
        self.by_name.insert(name.clone(), id);
        self.fluents.push(name);
        Ok(id)
    }

    /// Look up a declared fluent by name.
    #[must_use]
    pub fn fluent_id(&self, name: &str) -> Option<FluentId> {
        self.by_name.get(name).copied()
    }

    /// Queue an action; ids are assigned in insertion order.
    pub fn action(&mut self, spec: ActionSpec) -> &mut Self {
        self.actions.push(spec);
        self
    }

    pub fn init(&mut self, fluents: impl IntoIterator<Item = FluentId>) -> &mut Self {
        self.init.extend(fluents);
        self
    }

    pub fn goal(&mut self, fluents: impl IntoIterator<Item = FluentId>) -> &mut Self {
        self.goal.extend(fluents);
        self
    }

    /// Validate every reference and produce the task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::UnknownFluent`] for any out-of-range fluent id,
    /// [`TaskError::InvalidCost`] for negative or non-finite costs, and
    /// [`TaskError::EmptyName`] for unnamed actions.
    pub fn build(&self) -> Result<StripsTask, TaskError> {
        let n = self.fluents.len();
        let check = |context: &str, list: &[FluentId]| -> Result<Vec<FluentId>, TaskError> {
            if let Some(&bad) = list.iter().find(|f| f.index() >= n) {
                return Err(TaskError::UnknownFluent {
                    context: context.to_string(),
                    fluent: bad,
                });
            }
            Ok(normalized(list))
        };

        if ActionId::from_index(self.actions.len()).is_none() {
            return Err(TaskError::TooLarge { kind: "action" });
        }

        let mut actions = Vec::with_capacity(self.actions.len());
        for spec in &self.actions {
            if spec.name.is_empty() {
                return Err(TaskError::EmptyName { kind: "action" });
            }
            if !spec.cost.is_finite() || spec.cost < 0.0 {
                return Err(TaskError::InvalidCost {
                    action: spec.name.clone(),
                    cost: spec.cost,
                });
            }
            let ctx = format!("action {}", spec.name);
            let mut conditional_effects = Vec::with_capacity(spec.conditional_effects.len());
            for ce in &spec.conditional_effects {
                conditional_effects.push(ConditionalEffect {
                    condition: check(&ctx, &ce.condition)?,
                    add: check(&ctx, &ce.add)?,
                    delete: check(&ctx, &ce.delete)?,
                });
            }
            actions.push(Action {
                name: spec.name.clone(),
                precondition: check(&ctx, &spec.precondition)?,
                add: check(&ctx, &spec.add)?,
                delete: check(&ctx, &spec.delete)?,
                conditional_effects,
                cost: spec.cost,
            });
        }

        Ok(StripsTask {
            name: self.name.clone(),
            fluents: self.fluents.clone(),
            actions,
            init: check("init", &self.init)?,
            goal: check("goal", &self.goal)?,
        })
    }
}

fn normalized(list: &[FluentId]) -> Vec<FluentId> {
    let mut v = list.to_vec();
    v.sort_unstable();
    v.dedup();
    v
}

/// A validated propositional planning task.
#[derive(Debug, Clone, PartialEq)]
pub struct StripsTask {
    name: String,
    fluents: Vec<String>,
    actions: Vec<Action>,
    init: Vec<FluentId>,
    goal: Vec<FluentId>,
}

impl StripsTask {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn fluent_names(&self) -> &[String] {
        &self.fluents
    }

    #[must_use]
    pub fn fluent_name(&self, f: FluentId) -> Option<&str> {
        self.fluents.get(f.index()).map(String::as_str)
    }

    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Find an action by name (first match).
    #[must_use]
    pub fn action_id(&self, name: &str) -> Option<ActionId> {
        self.actions
            .iter()
            .position(|a| a.name == name)
            .and_then(ActionId::from_index)
    }

    #[must_use]
    pub fn init(&self) -> &[FluentId] {
        &self.init
    }

    #[must_use]
    pub fn goal(&self) -> &[FluentId] {
        &self.goal
    }

    #[must_use]
    pub fn init_state(&self) -> State {
        State::new(self.fluents.len(), self.init.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_room_builder() -> (TaskBuilder, FluentId, FluentId) {
        let mut b = TaskBuilder::new("two-room");
        let left = b.fluent("at-left").unwrap();
        let right = b.fluent("at-right").unwrap();
        b.action(ActionSpec::new("go-right").pre([left]).add([right]).del([left]));
        b.init([left]).goal([right]);
        (b, left, right)
    }

    #[test]
    fn build_resolves_everything() {
        let (b, left, right) = two_room_builder();
        let task = b.build().unwrap();
        assert_eq!(task.fluent_names().len(), 2);
        assert_eq!(task.actions().len(), 1);
        assert_eq!(task.init(), &[left]);
        assert_eq!(task.goal(), &[right]);
        assert_eq!(task.action_id("go-right"), Some(ActionId::new(0)));
        assert_eq!(task.fluent_name(right), Some("at-right"));
    }

    #[test]
    fn duplicate_fluent_rejected() {
        let mut b = TaskBuilder::new("t");
        b.fluent("p").unwrap();
        assert!(matches!(
            b.fluent("p"),
            Err(TaskError::DuplicateFluent { .. })
        ));
    }

    #[test]
    fn unknown_fluent_rejected() {
        let (mut b, _, _) = two_room_builder();
        b.action(ActionSpec::new("bad").add([FluentId::new(99)]));
        let err = b.build().unwrap_err();
        assert!(
            matches!(err, TaskError::UnknownFluent { .. }),
            "expected UnknownFluent, got {err:?}"
        );
    }

    #[test]
    fn negative_and_nan_costs_rejected() {
        for cost in [-1.0, f32::NAN, f32::INFINITY] {
            let (mut b, left, _) = two_room_builder();
            b.action(ActionSpec::new("weird").add([left]).cost(cost));
            assert!(matches!(b.build(), Err(TaskError::InvalidCost { .. })));
        }
    }

    #[test]
    fn fluent_lists_are_normalized() {
        let mut b = TaskBuilder::new("t");
        let p = b.fluent("p").unwrap();
        let q = b.fluent("q").unwrap();
        b.action(ActionSpec::new("a").add([q, p, q]));
        let task = b.build().unwrap();
        assert_eq!(task.actions()[0].add(), &[p, q]);
    }
}
