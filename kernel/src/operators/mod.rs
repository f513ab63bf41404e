//! Operators: actions, tasks and the planning-model contract.

pub mod action;
pub mod model;
pub mod task;
