//! Error taxonomy for the engine.
//!
//! Validation failures are refusals: they are returned before any state is
//! touched. Configuration problems are surfaced for the operator but never
//! stop the engine.

use thiserror::Error;

use crate::types::{CompetitorId, PairId, Role};

/// An edit was refused. State is unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("a handicap rule already exists at threshold {0}")]
    DuplicateThreshold(f64),

    #[error("run count must be at least 1")]
    NonPositiveRunCount,

    #[error("handicap threshold must be positive, got {0}")]
    NonPositiveThreshold(f64),

    #[error("competitor {0} cannot pair with themselves")]
    SelfPairing(CompetitorId),

    #[error("{name} is not eligible to rope {role}")]
    RoleMismatch { name: String, role: Role },

    #[error("qualifying round {} is locked", .0 + 1)]
    RoundLocked(usize),

    #[error("the final round is locked")]
    FinalLocked,

    #[error("invalid handicap {0}: must be a non-negative multiple of 0.5")]
    InvalidHandicap(f64),

    #[error("invalid run time {0}: must be a non-negative number of seconds")]
    InvalidTime(f64),

    #[error("competitor name must not be empty")]
    EmptyName,

    #[error("unknown competitor {0}")]
    UnknownCompetitor(CompetitorId),

    #[error("duplicate competitor {0}")]
    DuplicateCompetitor(CompetitorId),

    #[error("unknown pair {0}")]
    UnknownPair(PairId),

    #[error("pair has {runs} qualifying runs, round {} does not exist", .round + 1)]
    RoundOutOfRange { round: usize, runs: usize },

    #[error("{name} must be positive, got {value}")]
    NonPositiveSetting { name: &'static str, value: f64 },
}

/// The rule table cannot answer a lookup the way the operator intended.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("handicap rule table is empty; every pair falls back to 1 qualifying run")]
    EmptyRuleTable,

    #[error(
        "largest rule threshold {largest} is below the maximum combined handicap {max_handicap}; \
         pairs above it use the last rule"
    )]
    IncompleteCoverage { largest: f64, max_handicap: f64 },
}

/// A snapshot could not be read or does not describe a consistent state.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("pair {pair}: stored combined handicap {stored} does not match members ({actual})")]
    HandicapMismatch { pair: PairId, stored: f64, actual: f64 },

    #[error("pair {0} appears more than once")]
    DuplicatePair(PairId),
}
