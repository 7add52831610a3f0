//! Pair generation from the competitor roster.

use crate::handicap::HandicapTable;
use crate::types::{Competitor, Pair};

/// Competitors split by the end they may rope. A competitor eligible for
/// both ends appears in both pools.
#[derive(Debug, Clone, Default)]
pub struct CompetitorPools<'a> {
    pub heads: Vec<&'a Competitor>,
    pub heels: Vec<&'a Competitor>,
}

impl<'a> CompetitorPools<'a> {
    pub fn from_roster(roster: &'a [Competitor]) -> Self {
        Self {
            heads: roster.iter().filter(|c| c.role.can_head()).collect(),
            heels: roster.iter().filter(|c| c.role.can_heel()).collect(),
        }
    }

    /// Every (head, heel) combination allowed under `max_handicap`, in
    /// roster order. Nobody is paired with themselves.
    pub fn eligible(&self, max_handicap: f64) -> Vec<(&'a Competitor, &'a Competitor)> {
        let mut out = Vec::new();
        for &head in &self.heads {
            for &heel in &self.heels {
                if head.id == heel.id {
                    continue;
                }
                if head.handicap + heel.handicap <= max_handicap {
                    out.push((head, heel));
                }
            }
        }
        out
    }
}

/// Build a fresh pair set: one pair per eligible combination, each with an
/// empty run sheet sized by the rule table.
///
/// The result is unordered; pass it through the sequencer before use.
pub fn generate_pairs(
    pools: &CompetitorPools<'_>,
    table: &HandicapTable,
    max_handicap: f64,
) -> Vec<Pair> {
    pools
        .eligible(max_handicap)
        .into_iter()
        .map(|(head, heel)| {
            let runs = table.required_runs(head.handicap + heel.handicap);
            Pair::from_parts(head, heel, runs)
        })
        .collect()
}

#[cfg(test)]
#[path = "pairing_tests.rs"]
mod pairing_tests;
