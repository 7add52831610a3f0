//! Draw order: spread pairs so nobody ropes twice in a row.
//!
//! The order is a greedy heuristic over a shuffled pool, not a global
//! optimum. Each step prefers, in turn:
//! 1. a pair sharing no competitor with the previous pair (either role),
//! 2. a pair whose header differs from the previous header,
//! 3. whatever is first in the pool.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::Pair;

/// Reorder `pairs` into a draw. The output is always a permutation of the
/// input.
pub fn sequence_pairs<R: Rng + ?Sized>(pairs: Vec<Pair>, rng: &mut R) -> Vec<Pair> {
    let mut pool = pairs;
    pool.shuffle(rng);

    let mut ordered = Vec::with_capacity(pool.len());
    while let Some(last) = pool.len().checked_sub(1) {
        let next = match ordered.last() {
            Some(prev) => pick_next(&pool, prev),
            None => last,
        };
        ordered.push(pool.remove(next));
    }
    ordered
}

fn pick_next(pool: &[Pair], prev: &Pair) -> usize {
    pool.iter()
        .position(|p| !p.shares_competitor(prev))
        .or_else(|| pool.iter().position(|p| p.head().id != prev.head().id))
        .unwrap_or(0)
}

/// Number of adjacent positions where the same competitor ropes twice.
pub fn back_to_back_count(pairs: &[Pair]) -> usize {
    pairs
        .windows(2)
        .filter(|w| w[0].shares_competitor(&w[1]))
        .count()
}

#[cfg(test)]
#[path = "sequencer_tests.rs"]
mod sequencer_tests;
