//! `FluentSet`: fixed-capacity bitset over fluent identifiers.

use crate::carrier::fluent::FluentId;

const WORD_BITS: usize = 64;

/// Fixed-capacity bitset keyed by [`FluentId`].
///
/// Capacity is fixed at construction. Setting or testing a fluent outside the
/// capacity is a caller bug: `set`/`unset` ignore it and `contains` reports
/// `false`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FluentSet {
    words: Vec<u64>,
    capacity: usize,
}

impl FluentSet {
    /// Create an empty set able to hold fluents `0..capacity`.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.div_ceil(WORD_BITS)],
            capacity,
        }
    }

    /// Number of fluents this set can address.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert `f`. Returns `true` if it was not present before.
    pub fn set(&mut self, f: FluentId) -> bool {
        let i = f.index();
        if i >= self.capacity {
            return false;
        }
        let mask = 1u64 << (i % WORD_BITS);
        let word = &mut self.words[i / WORD_BITS];
        let fresh = *word & mask == 0;
        *word |= mask;
        fresh
    }

    /// Remove `f`. Returns `true` if it was present before.
    pub fn unset(&mut self, f: FluentId) -> bool {
        let i = f.index();
        if i >= self.capacity {
            return false;
        }
        let mask = 1u64 << (i % WORD_BITS);
        let word = &mut self.words[i / WORD_BITS];
        let present = *word & mask != 0;
        *word &= !mask;
        present
    }

    #[must_use]
    pub fn contains(&self, f: FluentId) -> bool {
        let i = f.index();
        i < self.capacity && self.words[i / WORD_BITS] & (1u64 << (i % WORD_BITS)) != 0
    }

    /// Clear every bit, keeping the capacity.
    pub fn reset(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
    }

    /// Number of fluents in the set.
    #[must_use]
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Iterate members in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = FluentId> + '_ {
        self.words.iter().enumerate().flat_map(|(wi, &word)| {
            let mut bits = word;
            std::iter::from_fn(move || {
                if bits == 0 {
                    return None;
                }
                let tz = bits.trailing_zeros() as usize;
                bits &= bits - 1;
                FluentId::from_index(wi * WORD_BITS + tz)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(i: u32) -> FluentId {
        FluentId::new(i)
    }

    #[test]
    fn set_reports_freshness() {
        let mut s = FluentSet::new(10);
        assert!(s.set(f(3)));
        assert!(!s.set(f(3)));
        assert!(s.contains(f(3)));
        assert!(!s.contains(f(4)));
    }

    #[test]
    fn unset_and_reset_clear_bits() {
        let mut s = FluentSet::new(130);
        s.set(f(0));
        s.set(f(64));
        s.set(f(129));
        assert_eq!(s.count(), 3);
        assert!(s.unset(f(64)));
        assert!(!s.unset(f(64)));
        assert_eq!(s.count(), 2);
        s.reset();
        assert!(s.is_empty());
        assert_eq!(s.capacity(), 130);
    }

    #[test]
    fn out_of_range_is_ignored() {
        let mut s = FluentSet::new(4);
        assert!(!s.set(f(4)));
        assert!(!s.contains(f(100)));
        assert!(s.is_empty());
    }

    #[test]
    fn iteration_is_ascending_across_words() {
        let mut s = FluentSet::new(200);
        for i in [150, 2, 64, 63, 199] {
            s.set(f(i));
        }
        let got: Vec<u32> = s.iter().map(FluentId::raw).collect();
        assert_eq!(got, vec![2, 63, 64, 150, 199]);
    }
}
