//! iwplan harness: named planning worlds and the runner that searches them.
//!
//! The harness wires a world's STRIPS task into the RP-IW engine, replays
//! the plan it finds through the kernel, and packages the outcome as a
//! content-addressed search report.
//!
//! The harness does NOT implement search or replay logic; it delegates to
//! `iwplan_search` and `iwplan_kernel`. Worlds provide domain data only.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod contract;
pub mod report;
pub mod runner;
pub mod worlds;
