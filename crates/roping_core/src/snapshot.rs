//! Serializable backup of the whole event state.
//!
//! The JSON shape is consumed verbatim by storage and import/export tools.
//! Run times are numbers, `null` or `"SAT"`.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{SnapshotError, ValidationError};
use crate::handicap::{HandicapRule, HandicapTable};
use crate::ledger::check_value;
use crate::types::{Competitor, EventSettings, Pair};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub settings: EventSettings,
    /// Snapshots without `handicapRules` restore with the standard table.
    #[serde(default = "standard_rules")]
    pub handicap_rules: Vec<HandicapRule>,
    pub competitors: Vec<Competitor>,
    #[serde(default)]
    pub pairs: Vec<Pair>,
    #[serde(default)]
    pub locked_rounds: Vec<usize>,
    #[serde(default)]
    pub final_locked: bool,
    /// Informational; ignored on restore.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
}

fn standard_rules() -> Vec<HandicapRule> {
    HandicapTable::standard().rules().to_vec()
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the snapshot describes a state the engine could have produced,
    /// and build its rule table.
    pub fn validate(&self) -> Result<HandicapTable, SnapshotError> {
        self.settings.validate()?;
        let table = HandicapTable::from_rules(self.handicap_rules.iter().copied())?;

        let mut seen = HashSet::new();
        for competitor in &self.competitors {
            competitor.validate()?;
            if !seen.insert(competitor.id) {
                return Err(ValidationError::DuplicateCompetitor(competitor.id).into());
            }
        }

        let mut pair_ids = HashSet::new();
        for pair in &self.pairs {
            if !pair_ids.insert(pair.id()) {
                return Err(SnapshotError::DuplicatePair(pair.id()));
            }
            if pair.head().id == pair.heel().id {
                return Err(ValidationError::SelfPairing(pair.head().id).into());
            }
            let actual = pair.head().handicap + pair.heel().handicap;
            if pair.combined_handicap() != actual {
                return Err(SnapshotError::HandicapMismatch {
                    pair: pair.id(),
                    stored: pair.combined_handicap(),
                    actual,
                });
            }
            let runs = pair.qualifying_runs().iter().copied();
            for value in runs.chain(std::iter::once(pair.final_run())) {
                check_value(value)?;
            }
        }
        Ok(table)
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod snapshot_tests;
