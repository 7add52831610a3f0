//! Incremental pair update after roster edits.

use std::collections::HashMap;

use rand::Rng;
use tracing::debug;

use crate::handicap::HandicapTable;
use crate::pairing::CompetitorPools;
use crate::sequencer::sequence_pairs;
use crate::types::{Pair, PairKey, RunTime};

/// Merge the current roster into an existing pair set.
///
/// Pairs whose (head, heel) key survives keep their id, recorded runs and
/// disqualified flag; their competitor snapshots and combined handicap are
/// refreshed and the qualifying sheet is resized to the rule table's quota,
/// growing or truncating at the tail only. New combinations get an empty
/// sheet. Pairs no longer eligible are dropped. The result is re-sequenced.
pub fn reconcile_pairs<R: Rng + ?Sized>(
    existing: Vec<Pair>,
    pools: &CompetitorPools<'_>,
    table: &HandicapTable,
    max_handicap: f64,
    rng: &mut R,
) -> Vec<Pair> {
    let mut by_key: HashMap<PairKey, Pair> =
        existing.into_iter().map(|p| (p.key(), p)).collect();

    let mut kept = 0usize;
    let mut merged = Vec::new();
    for (head, heel) in pools.eligible(max_handicap) {
        let combined = head.handicap + heel.handicap;
        let quota = table.required_runs(combined) as usize;
        let key = PairKey {
            head: head.id,
            heel: heel.id,
        };
        let pair = match by_key.remove(&key) {
            Some(mut pair) => {
                kept += 1;
                pair.head = head.clone();
                pair.heel = heel.clone();
                pair.combined_handicap = combined;
                pair.qualifying_runs.resize(quota, RunTime::Unset);
                pair
            }
            None => Pair::from_parts(head, heel, quota as u32),
        };
        merged.push(pair);
    }

    debug!(
        kept,
        created = merged.len() - kept,
        dropped = by_key.len(),
        "reconciled pair set"
    );
    sequence_pairs(merged, rng)
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod reconcile_tests;
