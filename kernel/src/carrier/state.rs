//! `State`: the set of fluents that hold in a world configuration.
//!
//! A state keeps two views of the same content:
//!
//! - a sorted fluent vector (the signature used for equality and hashing)
//! - a [`FluentSet`] for O(1) membership tests
//!
//! # Equality semantics
//!
//! Two states are equal iff their fluent vectors are equal. Capacity is not
//! part of identity; states from the same task always share it.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::carrier::fluent::FluentId;
use crate::carrier::fluent_set::FluentSet;

#[derive(Debug, Clone)]
pub struct State {
    fluents: Vec<FluentId>,
    bits: FluentSet,
}

impl State {
    /// Build a state over `num_fluents` fluents holding exactly `fluents`.
    ///
    /// Input order and duplicates are irrelevant. Ids `>= num_fluents` are
    /// dropped; callers that need to reject them validate beforehand.
    #[must_use]
    pub fn new(num_fluents: usize, fluents: impl IntoIterator<Item = FluentId>) -> Self {
        let mut bits = FluentSet::new(num_fluents);
        let mut vec: Vec<FluentId> = fluents
            .into_iter()
            .filter(|f| f.index() < num_fluents)
            .collect();
        vec.sort_unstable();
        vec.dedup();
        for &f in &vec {
            bits.set(f);
        }
        Self { fluents: vec, bits }
    }

    /// The sorted fluent signature.
    #[must_use]
    pub fn fluents(&self) -> &[FluentId] {
        &self.fluents
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fluents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fluents.is_empty()
    }

    #[must_use]
    pub fn num_fluents(&self) -> usize {
        self.bits.capacity()
    }

    #[must_use]
    pub fn entails(&self, f: FluentId) -> bool {
        self.bits.contains(f)
    }

    #[must_use]
    pub fn entails_all(&self, fluents: &[FluentId]) -> bool {
        fluents.iter().all(|&f| self.bits.contains(f))
    }

    /// Make `f` true. Returns `true` if the state changed.
    pub fn insert(&mut self, f: FluentId) -> bool {
        if !self.bits.set(f) {
            return false;
        }
        if let Err(pos) = self.fluents.binary_search(&f) {
            self.fluents.insert(pos, f);
        }
        true
    }

    /// Make `f` false. Returns `true` if the state changed.
    pub fn remove(&mut self, f: FluentId) -> bool {
        if !self.bits.unset(f) {
            return false;
        }
        if let Ok(pos) = self.fluents.binary_search(&f) {
            self.fluents.remove(pos);
        }
        true
    }

    /// Deterministic 64-bit hash of the fluent signature.
    ///
    /// Used for hash-table placement only; not a content address. Stable
    /// across runs and processes (`DefaultHasher::new()` uses fixed keys).
    #[must_use]
    pub fn bucket_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.fluents.hash(&mut hasher);
        hasher.finish()
    }

    /// Little-endian `u32` encoding of the fluent signature.
    #[must_use]
    pub fn signature_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.fluents.len() * 4);
        for f in &self.fluents {
            buf.extend_from_slice(&f.raw().to_le_bytes());
        }
        buf
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.fluents == other.fluents
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fluents.hash(state);
    }
}
