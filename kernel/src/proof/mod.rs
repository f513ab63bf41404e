//! Proof surface: canonical serialization, content hashing and plan replay.

pub mod canon;
pub mod hash;
pub mod replay;
