//! Run-time ledger: recording results and round locks.
//!
//! The write operations on [`Pair`] are pure data updates. Lock checks and the
//! over-limit entry policy live at the edit boundary (see
//! [`Competition`](crate::Competition)), so programmatic corrections such as
//! reconciliation are never blocked by a lock.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::ValidationError;
use crate::types::{Pair, RunTime};

/// A run slot on a pair's sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    /// Zero-based qualifying round.
    Qualifying(usize),
    Final,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Qualifying(round) => write!(f, "round {}", round + 1),
            Slot::Final => f.write_str("final"),
        }
    }
}

/// Raw input from the timer's table, before the time-limit policy applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunEntry {
    Clear,
    Time(f64),
    NoScore,
}

impl RunEntry {
    /// Resolve into a stored value. A time above `time_limit` becomes
    /// [`RunTime::NoScore`] unless the entry is `authorized`.
    pub fn resolve(self, time_limit: f64, authorized: bool) -> Result<RunTime, ValidationError> {
        match self {
            RunEntry::Clear => Ok(RunTime::Unset),
            RunEntry::NoScore => Ok(RunTime::NoScore),
            RunEntry::Time(secs) => {
                check_time(secs)?;
                if secs > time_limit && !authorized {
                    Ok(RunTime::NoScore)
                } else {
                    Ok(RunTime::Seconds(secs))
                }
            }
        }
    }
}

fn check_time(secs: f64) -> Result<(), ValidationError> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(ValidationError::InvalidTime(secs));
    }
    Ok(())
}

pub(crate) fn check_value(value: RunTime) -> Result<(), ValidationError> {
    match value {
        RunTime::Seconds(secs) => check_time(secs),
        RunTime::Unset | RunTime::NoScore => Ok(()),
    }
}

impl Pair {
    /// Write one qualifying slot and recompute the disqualified flag from
    /// the whole sheet.
    pub fn set_qualifying_run(&mut self, round: usize, value: RunTime) -> Result<(), ValidationError> {
        check_value(value)?;
        let runs = self.qualifying_runs.len();
        let slot = self
            .qualifying_runs
            .get_mut(round)
            .ok_or(ValidationError::RoundOutOfRange { round, runs })?;
        *slot = value;
        self.disqualified =
            self.qualifying_runs.iter().any(|r| r.is_no_score()) || self.final_run.is_no_score();
        Ok(())
    }

    /// Write the final slot. The final can disqualify a pair but never
    /// clears a disqualification.
    pub fn set_final_run(&mut self, value: RunTime) -> Result<(), ValidationError> {
        check_value(value)?;
        self.final_run = value;
        self.disqualified = self.disqualified || value.is_no_score();
        Ok(())
    }

    pub fn run(&self, slot: Slot) -> Option<RunTime> {
        match slot {
            Slot::Qualifying(round) => self.qualifying_runs.get(round).copied(),
            Slot::Final => Some(self.final_run),
        }
    }
}

/// Rounds closed for editing. Advisory: checked at the edit boundary only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundLocks {
    rounds: BTreeSet<usize>,
    final_locked: bool,
}

impl RoundLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts<I: IntoIterator<Item = usize>>(rounds: I, final_locked: bool) -> Self {
        Self {
            rounds: rounds.into_iter().collect(),
            final_locked,
        }
    }

    /// Returns false if the round was already locked.
    pub fn lock_round(&mut self, round: usize) -> bool {
        self.rounds.insert(round)
    }

    /// Returns false if the round was not locked.
    pub fn unlock_round(&mut self, round: usize) -> bool {
        self.rounds.remove(&round)
    }

    /// Flip a round's lock; returns the new state.
    pub fn toggle_round(&mut self, round: usize) -> bool {
        if self.unlock_round(round) {
            false
        } else {
            self.lock_round(round)
        }
    }

    pub fn lock_final(&mut self) {
        self.final_locked = true;
    }

    pub fn unlock_final(&mut self) {
        self.final_locked = false;
    }

    pub fn toggle_final(&mut self) -> bool {
        self.final_locked = !self.final_locked;
        self.final_locked
    }

    pub fn is_round_locked(&self, round: usize) -> bool {
        self.rounds.contains(&round)
    }

    pub fn is_final_locked(&self) -> bool {
        self.final_locked
    }

    /// Locked qualifying rounds in ascending order.
    pub fn locked_rounds(&self) -> Vec<usize> {
        self.rounds.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.rounds.clear();
        self.final_locked = false;
    }

    /// Refuse an edit to a locked slot.
    pub fn check(&self, slot: Slot) -> Result<(), ValidationError> {
        match slot {
            Slot::Qualifying(round) if self.is_round_locked(round) => {
                Err(ValidationError::RoundLocked(round))
            }
            Slot::Final if self.final_locked => Err(ValidationError::FinalLocked),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod ledger_tests;
