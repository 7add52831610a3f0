//! Averages, final call order and standings.

use std::cmp::Ordering;

use crate::types::Pair;

/// A pair's place in an ordered list, with the average it was ordered by.
#[derive(Debug, Clone, Copy)]
pub struct Standing<'a> {
    /// One-based position.
    pub place: usize,
    pub pair: &'a Pair,
    pub average: f64,
}

fn qualifying_times(pair: &Pair) -> Option<Vec<f64>> {
    if pair.is_disqualified() || pair.qualifying_runs().is_empty() {
        return None;
    }
    pair.qualifying_runs().iter().map(|r| r.seconds()).collect()
}

/// Mean of the qualifying runs. `None` if the pair is disqualified or any
/// qualifying slot is not a time.
pub fn qualifying_average(pair: &Pair) -> Option<f64> {
    let times = qualifying_times(pair)?;
    Some(times.iter().sum::<f64>() / times.len() as f64)
}

/// Mean over every qualifying run plus the final. `None` unless all of them
/// are times and the pair is not disqualified.
pub fn final_average(pair: &Pair) -> Option<f64> {
    let times = qualifying_times(pair)?;
    let final_time = pair.final_run().seconds()?;
    Some((times.iter().sum::<f64>() + final_time) / (times.len() + 1) as f64)
}

/// Pairs that have finished qualifying clean and go to the final.
pub fn finalists(pairs: &[Pair]) -> Vec<&Pair> {
    pairs
        .iter()
        .filter(|p| qualifying_average(p).is_some())
        .collect()
}

fn ordered_by<'a, F>(pairs: &'a [Pair], average: F, descending: bool) -> Vec<Standing<'a>>
where
    F: Fn(&Pair) -> Option<f64>,
{
    let mut entries: Vec<(&Pair, f64)> = pairs
        .iter()
        .filter_map(|p| average(p).map(|avg| (p, avg)))
        .collect();
    // sort_by is stable: exact ties keep their draw order.
    entries.sort_by(|a, b| {
        let ord = a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal);
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });
    entries
        .into_iter()
        .enumerate()
        .map(|(i, (pair, average))| Standing {
            place: i + 1,
            pair,
            average,
        })
        .collect()
}

/// Order in which finalists are called: slowest qualifying average first,
/// so the fastest pair ropes last.
pub fn final_call_order(pairs: &[Pair]) -> Vec<Standing<'_>> {
    ordered_by(pairs, qualifying_average, true)
}

/// Final ranking: pairs with a final average, fastest first.
pub fn rank(pairs: &[Pair]) -> Vec<Standing<'_>> {
    ordered_by(pairs, final_average, false)
}

/// Number of qualifying round columns: the longest run quota.
pub fn max_qualifying_rounds(pairs: &[Pair]) -> usize {
    pairs.iter().map(|p| p.run_quota()).max().unwrap_or(0)
}

/// True once every pair is either out or has a value in every qualifying slot.
pub fn qualifying_complete(pairs: &[Pair]) -> bool {
    pairs
        .iter()
        .all(|p| p.is_disqualified() || p.qualifying_runs().iter().all(|r| r.is_set()))
}

#[cfg(test)]
#[path = "ranking_tests.rs"]
mod ranking_tests;
