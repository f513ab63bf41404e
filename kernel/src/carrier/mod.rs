//! State carrier: fluent identifiers, fluent bitsets and planning states.

pub mod fluent;
pub mod fluent_set;
pub mod state;
