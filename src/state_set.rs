//! Sets of cell states.
//!
//! A rule input position accepts any state of a [`StateSet`]. The set is a
//! plain bit set backed by `u64` words, growing as needed.

use std::fmt::{Debug, Formatter};
use std::ops::{BitAnd, Range};

/// A set of cell states backed by a vector of u64 words.
///
/// The last word is never zero, so equal sets have equal representations.
#[derive(Clone, Default, Eq, PartialEq, Hash)]
pub struct StateSet {
    words: Vec<u64>,
}

impl StateSet {
    /// Number of bits per word.
    const BITS_PER_WORD: usize = 64;

    /// Creates an empty set.
    pub fn empty() -> Self {
        Self { words: Vec::new() }
    }

    /// Creates the set `{0, 1, ..., num_states - 1}`.
    pub fn all(num_states: u32) -> Self {
        (0..num_states).collect()
    }

    /// Creates the set holding a single state.
    pub fn single(state: u32) -> Self {
        let mut set = Self::empty();
        set.insert(state);
        set
    }

    /// Returns the number of states in the set.
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns true if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    #[inline]
    fn word_and_bit(state: u32) -> (usize, usize) {
        let index = state as usize;
        (index / Self::BITS_PER_WORD, index % Self::BITS_PER_WORD)
    }

    /// Returns true if the set contains `state`.
    #[inline]
    pub fn contains(&self, state: u32) -> bool {
        let (word_idx, bit_idx) = Self::word_and_bit(state);
        match self.words.get(word_idx) {
            Some(word) => word & (1u64 << bit_idx) != 0,
            None => false,
        }
    }

    /// Adds `state` to the set. Returns true if it was not present.
    pub fn insert(&mut self, state: u32) -> bool {
        let (word_idx, bit_idx) = Self::word_and_bit(state);
        if word_idx >= self.words.len() {
            self.words.resize(word_idx + 1, 0);
        }
        let mask = 1u64 << bit_idx;
        let was_clear = self.words[word_idx] & mask == 0;
        self.words[word_idx] |= mask;
        was_clear
    }

    /// Returns the smallest state in the set.
    pub fn first(&self) -> Option<u32> {
        self.iter().next()
    }

    /// Returns the largest state in the set.
    pub fn max(&self) -> Option<u32> {
        let word_idx = self.words.len().checked_sub(1)?;
        let word = self.words[word_idx];
        let bit_idx = Self::BITS_PER_WORD - 1 - word.leading_zeros() as usize;
        Some((word_idx * Self::BITS_PER_WORD + bit_idx) as u32)
    }

    /// Returns the states common to both sets.
    pub fn intersection(&self, other: &StateSet) -> StateSet {
        let mut words: Vec<u64> = self
            .words
            .iter()
            .zip(other.words.iter())
            .map(|(a, b)| a & b)
            .collect();
        while words.last() == Some(&0) {
            words.pop();
        }
        StateSet { words }
    }

    /// Returns true if the sets have no state in common.
    pub fn is_disjoint(&self, other: &StateSet) -> bool {
        self.words.iter().zip(other.words.iter()).all(|(a, b)| a & b == 0)
    }

    /// Returns an iterator over the states in ascending order.
    pub fn iter(&self) -> StateSetIter<'_> {
        StateSetIter {
            set: self,
            word_idx: 0,
            current_word: self.words.first().copied().unwrap_or(0),
        }
    }
}

impl Debug for StateSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<u32> for StateSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut set = StateSet::empty();
        set.extend(iter);
        set
    }
}

impl Extend<u32> for StateSet {
    fn extend<I: IntoIterator<Item = u32>>(&mut self, iter: I) {
        for state in iter {
            self.insert(state);
        }
    }
}

impl From<&[u32]> for StateSet {
    fn from(states: &[u32]) -> Self {
        states.iter().copied().collect()
    }
}

impl From<Vec<u32>> for StateSet {
    fn from(states: Vec<u32>) -> Self {
        states.into_iter().collect()
    }
}

impl From<&Vec<u32>> for StateSet {
    fn from(states: &Vec<u32>) -> Self {
        states.iter().copied().collect()
    }
}

impl<const N: usize> From<[u32; N]> for StateSet {
    fn from(states: [u32; N]) -> Self {
        states.into_iter().collect()
    }
}

impl From<Range<u32>> for StateSet {
    fn from(states: Range<u32>) -> Self {
        states.collect()
    }
}

impl From<&StateSet> for StateSet {
    fn from(set: &StateSet) -> Self {
        set.clone()
    }
}

impl BitAnd for &StateSet {
    type Output = StateSet;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.intersection(rhs)
    }
}

impl<'a> IntoIterator for &'a StateSet {
    type Item = u32;
    type IntoIter = StateSetIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the states of a [`StateSet`].
pub struct StateSetIter<'a> {
    set: &'a StateSet,
    word_idx: usize,
    current_word: u64,
}

impl Iterator for StateSetIter<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current_word != 0 {
                let bit_idx = self.current_word.trailing_zeros() as usize;
                self.current_word &= self.current_word - 1; // Clear lowest set bit
                return Some((self.word_idx * StateSet::BITS_PER_WORD + bit_idx) as u32);
            }

            self.word_idx += 1;
            if self.word_idx >= self.set.words.len() {
                return None;
            }
            self.current_word = self.set.words[self.word_idx];
        }
    }
}
