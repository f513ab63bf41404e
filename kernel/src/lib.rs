//! iwplan kernel: the propositional planning model the search runs over.
//!
//! # API Surface
//!
//! - [`operators::task::TaskBuilder`] -- build and validate a STRIPS task
//! - [`operators::model::PlanningModel`] -- the successor/goal/cost contract the search consumes
//! - [`proof::replay::replay_plan`] -- verify a plan by deterministic replay
//!
//! # Module Dependency Direction
//!
//! `carrier` ← `operators` ← `proof`
//!
//! One-way only. No cycles. `proof` depends on `operators` and `carrier`.
//! `operators` depends on `carrier`. `carrier` depends on nothing internal.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod carrier;
pub mod operators;
pub mod proof;
