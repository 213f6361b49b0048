use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::rules::{MAX_OPERAND, MIN_OPERAND};

/// Number of pairs in the Classic set: all `(i, j)` with `2 <= i <= j <= 9`.
pub const CLASSIC_PAIR_COUNT: usize = 36;

/// An ordered pair of operands. Classic pairs always satisfy `a <= b`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OperandPair {
    pub a: u8,
    pub b: u8,
}

impl OperandPair {
    pub fn new(a: u8, b: u8) -> Self {
        Self { a, b }
    }

    pub fn product(&self) -> u32 {
        u32::from(self.a) * u32::from(self.b)
    }
}

/// Builds the canonical Classic pair set in construction order
/// (outer operand ascending, inner operand ascending from the outer one).
pub fn all_pairs() -> Vec<OperandPair> {
    let mut v = Vec::with_capacity(CLASSIC_PAIR_COUNT);
    for i in MIN_OPERAND..=MAX_OPERAND {
        for j in i..=MAX_OPERAND {
            v.push(OperandPair::new(i, j));
        }
    }
    v
}

/// Fisher-Yates: walk from the last index down, swapping each element with a
/// uniformly chosen index in `[0, k]`.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for k in (1..items.len()).rev() {
        let j = rng.random_range(0..=k);
        items.swap(k, j);
    }
}

/// The Classic-mode question queue.
///
/// The pair at the front is the one currently being asked. It leaves the queue
/// only when it is answered correctly, so an empty queue means every pair has
/// been cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairQueue {
    pairs: VecDeque<OperandPair>,
}

impl PairQueue {
    /// Generates a uniformly shuffled queue over the full Classic pair set.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut pairs = all_pairs();
        shuffle(&mut pairs, rng);
        Self {
            pairs: pairs.into(),
        }
    }

    /// Generates the same queue a controller seeded with `seed` starts with.
    pub fn new_with_seed(seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        Self::generate(&mut rng)
    }

    pub fn from_pairs<I: IntoIterator<Item = OperandPair>>(pairs: I) -> Self {
        Self {
            pairs: pairs.into_iter().collect(),
        }
    }

    pub fn front(&self) -> Option<OperandPair> {
        self.pairs.front().copied()
    }

    /// Removes and returns the front pair. Callers must not rely on this on an
    /// empty queue; emptiness is the Classic win signal.
    pub fn dequeue(&mut self) -> Option<OperandPair> {
        self.pairs.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OperandPair> {
        self.pairs.iter()
    }
}
