//! Handicap rule table: combined handicap -> number of qualifying runs.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigurationError, ValidationError};

/// Run count used when the table has no rules at all.
pub const DEFAULT_RUN_COUNT: u32 = 1;

/// Pairs whose combined handicap is at most `max_handicap` run `runs`
/// qualifying rounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandicapRule {
    pub max_handicap: f64,
    pub runs: u32,
}

/// Step function over combined handicap. Rules are kept sorted by threshold
/// and no two share a threshold.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HandicapTable {
    rules: Vec<HandicapRule>,
}

impl HandicapTable {
    /// An empty table. Lookups fall back to [`DEFAULT_RUN_COUNT`].
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The usual jackpot table: up to 3.5 runs one, up to 4.5 runs two,
    /// up to 6.5 runs three, anything above runs four.
    pub fn standard() -> Self {
        Self {
            rules: vec![
                HandicapRule { max_handicap: 3.5, runs: 1 },
                HandicapRule { max_handicap: 4.5, runs: 2 },
                HandicapRule { max_handicap: 6.5, runs: 3 },
                HandicapRule { max_handicap: 100.0, runs: 4 },
            ],
        }
    }

    /// Build a table, rejecting the first invalid or duplicate rule.
    pub fn from_rules<I>(rules: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = HandicapRule>,
    {
        let mut table = Self::new();
        for rule in rules {
            table.add_rule(rule.max_handicap, rule.runs)?;
        }
        Ok(table)
    }

    pub fn rules(&self) -> &[HandicapRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Insert a rule. Fails if the threshold is not positive, the run count
    /// is zero, or a rule already sits at exactly this threshold.
    pub fn add_rule(&mut self, max_handicap: f64, runs: u32) -> Result<(), ValidationError> {
        if !(max_handicap.is_finite() && max_handicap > 0.0) {
            return Err(ValidationError::NonPositiveThreshold(max_handicap));
        }
        if runs == 0 {
            return Err(ValidationError::NonPositiveRunCount);
        }
        if self.rules.iter().any(|r| r.max_handicap == max_handicap) {
            return Err(ValidationError::DuplicateThreshold(max_handicap));
        }
        let at = self.rules.partition_point(|r| r.max_handicap < max_handicap);
        self.rules.insert(at, HandicapRule { max_handicap, runs });
        Ok(())
    }

    /// Remove the rule at exactly `max_handicap`, if any.
    pub fn remove_rule(&mut self, max_handicap: f64) -> Option<HandicapRule> {
        let at = self.rules.iter().position(|r| r.max_handicap == max_handicap)?;
        Some(self.rules.remove(at))
    }

    /// Run count for the smallest threshold at or above `combined`, or the
    /// largest threshold's count if `combined` is above them all.
    pub fn lookup(&self, combined: f64) -> Result<u32, ConfigurationError> {
        self.rules
            .iter()
            .find(|r| r.max_handicap >= combined)
            .or_else(|| self.rules.last())
            .map(|r| r.runs)
            .ok_or(ConfigurationError::EmptyRuleTable)
    }

    /// Like [`lookup`](Self::lookup), but an empty table yields
    /// [`DEFAULT_RUN_COUNT`] and logs the misconfiguration.
    pub fn required_runs(&self, combined: f64) -> u32 {
        match self.lookup(combined) {
            Ok(runs) => runs,
            Err(err) => {
                warn!(combined, "{err}");
                DEFAULT_RUN_COUNT
            }
        }
    }

    /// Check that the table has an explicit rule for every handicap up to
    /// `max_handicap`.
    pub fn coverage(&self, max_handicap: f64) -> Result<(), ConfigurationError> {
        let largest = self
            .rules
            .last()
            .ok_or(ConfigurationError::EmptyRuleTable)?
            .max_handicap;
        if largest < max_handicap {
            return Err(ConfigurationError::IncompleteCoverage {
                largest,
                max_handicap,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "handicap_tests.rs"]
mod handicap_tests;
