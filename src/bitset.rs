//! Fixed-capacity vertex subsets packed into `u64` words.

use crate::error::DomSetError;
use std::fmt;

/// Number of bits per storage word.
pub const WORD_BITS: usize = 64;

/// Maximum number of storage words in a single set.
pub const MAX_WORDS: usize = 64;

/// Largest vertex count a [`BitSet`] can represent.
pub const MAX_VERTICES: usize = WORD_BITS * MAX_WORDS;

#[inline(always)]
const fn word_index(pos: usize) -> usize {
    pos / WORD_BITS
}

#[inline(always)]
const fn bit(pos: usize) -> u64 {
    1u64 << (pos % WORD_BITS)
}

/// Number of words needed to hold `n` bits.
#[inline(always)]
const fn words_for(n: usize) -> usize {
    n.div_ceil(WORD_BITS)
}

// ============================================================================
// BitSet
// ============================================================================

/// A subset of `[0, n)` stored as `ceil(n / 64)` words.
///
/// The universe size `n` is fixed at construction and the word storage is never
/// resized. Bits at positions `>= n` are always zero.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitSet {
    words: Box<[u64]>,
    universe: usize,
}

impl BitSet {
    /// Creates an empty subset of `[0, n)`.
    ///
    /// # Errors
    /// Returns [`DomSetError::CapacityExceeded`] if `n > MAX_VERTICES`.
    pub fn new(n: usize) -> Result<Self, DomSetError> {
        if n > MAX_VERTICES {
            return Err(DomSetError::CapacityExceeded {
                requested: n,
                max: MAX_VERTICES,
            });
        }
        Ok(Self::zeroed(n))
    }

    /// Empty set over a universe already known to fit, e.g. the order of a built graph.
    pub(crate) fn zeroed(n: usize) -> Self {
        debug_assert!(n <= MAX_VERTICES);
        Self {
            words: vec![0u64; words_for(n)].into_boxed_slice(),
            universe: n,
        }
    }

    /// Creates the full subset `[0, n)`.
    ///
    /// # Errors
    /// Returns [`DomSetError::CapacityExceeded`] if `n > MAX_VERTICES`.
    pub fn full(n: usize) -> Result<Self, DomSetError> {
        let mut set = Self::new(n)?;
        set.fill();
        Ok(set)
    }

    /// Builds a subset of `[0, n)` from vertex ids.
    ///
    /// # Errors
    /// Returns [`DomSetError::CapacityExceeded`] for an oversized universe and
    /// [`DomSetError::VertexOutOfRange`] for ids `>= n`.
    pub fn from_vertices<I>(n: usize, vertices: I) -> Result<Self, DomSetError>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut set = Self::new(n)?;
        for v in vertices {
            if v >= n {
                return Err(DomSetError::VertexOutOfRange { vertex: v, n });
            }
            set.add(v);
        }
        Ok(set)
    }

    /// Size of the universe this set ranges over.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.universe
    }

    /// Adds `pos` to the set.
    ///
    /// # Panics
    /// Panics if `pos` is outside the universe.
    #[inline]
    pub fn add(&mut self, pos: usize) {
        self.check(pos);
        self.words[word_index(pos)] |= bit(pos);
    }

    /// Removes `pos` from the set.
    ///
    /// # Panics
    /// Panics if `pos` is outside the universe.
    #[inline]
    pub fn remove(&mut self, pos: usize) {
        self.check(pos);
        self.words[word_index(pos)] &= !bit(pos);
    }

    /// Returns whether `pos` is a member.
    ///
    /// # Panics
    /// Panics if `pos` is outside the universe.
    #[inline]
    pub fn contains(&self, pos: usize) -> bool {
        self.check(pos);
        (self.words[word_index(pos)] & bit(pos)) != 0
    }

    /// Population count.
    #[inline]
    pub fn size(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns `true` if the set has no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Returns `true` if every vertex of the universe is a member.
    pub fn is_full(&self) -> bool {
        self.size() == self.universe
    }

    /// Removes every member.
    #[inline]
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    /// Adds every vertex of the universe.
    pub fn fill(&mut self) {
        self.words.fill(u64::MAX);
        let tail = self.universe % WORD_BITS;
        if tail != 0 {
            if let Some(last) = self.words.last_mut() {
                *last = (1u64 << tail) - 1;
            }
        }
    }

    /// In-place union with a set over the same universe.
    ///
    /// # Panics
    /// Panics if the universes differ.
    pub fn union_with(&mut self, other: &BitSet) {
        assert_eq!(
            self.universe, other.universe,
            "union of sets over different universes"
        );
        for (a, &b) in self.words.iter_mut().zip(other.words.iter()) {
            *a |= b;
        }
    }

    /// Copies the members of `other` into `self`.
    ///
    /// # Panics
    /// Panics if the universes differ.
    pub fn copy_from(&mut self, other: &BitSet) {
        assert_eq!(
            self.universe, other.universe,
            "copy between sets over different universes"
        );
        self.words.copy_from_slice(&other.words);
    }

    /// Iterates over members in ascending order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            words: &self.words,
            index: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }

    /// Returns the members as an ascending vector.
    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }

    #[inline(always)]
    fn check(&self, pos: usize) {
        assert!(
            pos < self.universe,
            "vertex {pos} out of range for a set over {} vertices",
            self.universe
        );
    }
}

impl fmt::Debug for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a BitSet {
    type Item = usize;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Ascending iterator over the members of a [`BitSet`].
pub struct Iter<'a> {
    words: &'a [u64],
    index: usize,
    current: u64,
}

impl Iterator for Iter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if self.current != 0 {
                let offset = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                return Some(self.index * WORD_BITS + offset);
            }
            self.index += 1;
            self.current = *self.words.get(self.index)?;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    #[test]
    fn add_contains_remove() {
        let mut set = BitSet::new(130).unwrap();
        for pos in [0, 1, 63, 64, 65, 127, 128, 129] {
            assert!(!set.contains(pos));
            set.add(pos);
            assert!(set.contains(pos));
        }
        assert_eq!(set.size(), 8);

        set.remove(64);
        assert!(!set.contains(64));
        assert!(set.contains(63));
        assert!(set.contains(65));
        assert_eq!(set.size(), 7);
    }

    #[test]
    fn size_tracks_random_adds_and_removes() {
        const N: usize = 200;
        let mut rng = XorShiftRng::seed_from_u64(0xB175);
        let mut set = BitSet::new(N).unwrap();
        let mut reference = [false; N];

        for _ in 0..5_000 {
            let pos = rng.random_range(0..N);
            if rng.random_bool(0.5) {
                set.add(pos);
                reference[pos] = true;
            } else {
                set.remove(pos);
                reference[pos] = false;
            }
            assert_eq!(set.contains(pos), reference[pos]);
        }

        let expected = reference.iter().filter(|&&b| b).count();
        assert_eq!(set.size(), expected);
        let members: Vec<usize> = (0..N).filter(|&v| reference[v]).collect();
        assert_eq!(set.to_vec(), members);
    }

    #[test]
    fn adding_twice_counts_once() {
        let mut set = BitSet::new(10).unwrap();
        set.add(3);
        set.add(3);
        assert_eq!(set.size(), 1);
        set.remove(3);
        set.remove(3);
        assert!(set.is_empty());
    }

    #[test]
    fn fill_keeps_bits_beyond_universe_clear() {
        for n in [1, 5, 63, 64, 65, 128, 129] {
            let set = BitSet::full(n).unwrap();
            assert_eq!(set.size(), n, "n={n}");
            assert!(set.is_full());
            assert_eq!(set.to_vec(), (0..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn empty_universe() {
        let set = BitSet::new(0).unwrap();
        assert_eq!(set.size(), 0);
        assert!(set.is_empty());
        assert!(set.is_full());
        assert_eq!(set.iter().count(), 0);
    }

    #[test]
    fn capacity_limit_is_enforced() {
        assert!(BitSet::new(MAX_VERTICES).is_ok());
        assert_eq!(
            BitSet::new(MAX_VERTICES + 1),
            Err(DomSetError::CapacityExceeded {
                requested: MAX_VERTICES + 1,
                max: MAX_VERTICES,
            })
        );
    }

    #[test]
    fn from_vertices_rejects_out_of_range() {
        let err = BitSet::from_vertices(4, [0, 4]).unwrap_err();
        assert_eq!(err, DomSetError::VertexOutOfRange { vertex: 4, n: 4 });
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn contains_panics_past_universe() {
        let set = BitSet::new(10).unwrap();
        let _ = set.contains(10);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn add_panics_past_universe() {
        let mut set = BitSet::new(64).unwrap();
        set.add(64);
    }

    #[test]
    fn union_and_copy() {
        let mut a = BitSet::from_vertices(70, [1, 66]).unwrap();
        let b = BitSet::from_vertices(70, [2, 66, 69]).unwrap();
        a.union_with(&b);
        assert_eq!(a.to_vec(), vec![1, 2, 66, 69]);

        let mut c = BitSet::new(70).unwrap();
        c.copy_from(&b);
        assert_eq!(c, b);
    }

    #[test]
    fn debug_lists_members() {
        let set = BitSet::from_vertices(8, [5, 1]).unwrap();
        assert_eq!(format!("{set:?}"), "{1, 5}");
    }
}
