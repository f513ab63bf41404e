//! Shared helpers for the lock tests and the `search_fixture` binary.

pub mod search_test_helpers;
