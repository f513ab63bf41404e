//! iwplan search: Iterative-Width search with novelty pruning, refined by
//! relaxed-plan partitions.
//!
//! This crate depends only on `iwplan_kernel`; it does NOT depend on
//! `iwplan_harness`.
//!
//! # Crate dependency graph
//!
//! ```text
//! iwplan_kernel  ←  iwplan_search  ←  iwplan_harness
//! (planning model)  (RP-IW engine)    (worlds, runner, reports)
//! ```
//!
//! # Key types
//!
//! - [`engine::RpIwEngine`] -- the search driver (`start` → `do_search` → `find_solution`)
//! - [`node::NodeArena`] -- owner of every accepted search node
//! - [`index::NodeIndex`] -- closed set and open-membership index
//! - [`novelty::NoveltyEvaluator`] -- width oracle; [`novelty::PartitionedNovelty`] ships by default
//! - [`relaxed_plan::RelaxedPlanHeuristic`] -- source of the relevant-fluent set
//! - [`policy::IwPolicyV1`] -- bound, relaxed-plan toggle and comparator selection
//! - [`observer::SearchObserver`] -- progress hooks

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod engine;
pub mod error;
pub mod frontier;
pub mod index;
pub mod node;
pub mod novelty;
pub mod observer;
pub mod partition;
pub mod plan;
pub mod policy;
pub mod relaxed_plan;
pub mod stats;
