//! Domain types: competitors, pairs, run times and event settings.

use chrono::{Local, NaiveDate};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::ValidationError;

/// Literal stored for the no-score marker.
pub const NO_SCORE: &str = "SAT";

/// Handicaps are rated in half-point steps.
pub const HANDICAP_STEP: f64 = 0.5;

// =============================================================================
// Identifiers
// =============================================================================

/// Opaque competitor identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompetitorId(pub Uuid);

impl CompetitorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Id derived from a full name, so re-reading the same roster yields the
    /// same ids and therefore the same pair keys.
    pub fn from_name(full_name: &str) -> Self {
        let normalized = full_name.trim().to_lowercase();
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, normalized.as_bytes()))
    }
}

impl Default for CompetitorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CompetitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque pair identity. Survives reconciliation, never regeneration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairId(pub Uuid);

impl PairId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PairId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity used to match pairs across roster changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairKey {
    pub head: CompetitorId,
    pub heel: CompetitorId,
}

// =============================================================================
// Competitors
// =============================================================================

/// Which end of the steer a competitor may rope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Head,
    Heel,
    Both,
}

impl Role {
    pub fn can_head(self) -> bool {
        matches!(self, Role::Head | Role::Both)
    }

    pub fn can_heel(self) -> bool {
        matches!(self, Role::Heel | Role::Both)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::Head => "head",
            Role::Heel => "heel",
            Role::Both => "both",
        };
        f.write_str(label)
    }
}

/// A registered roper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    pub id: CompetitorId,
    pub full_name: String,
    pub nickname: String,
    pub role: Role,
    pub handicap: f64,
}

impl Competitor {
    /// Register a new competitor with a fresh id.
    pub fn new(
        full_name: &str,
        nickname: &str,
        role: Role,
        handicap: f64,
    ) -> Result<Self, ValidationError> {
        Self::with_id(CompetitorId::new(), full_name, nickname, role, handicap)
    }

    pub fn with_id(
        id: CompetitorId,
        full_name: &str,
        nickname: &str,
        role: Role,
        handicap: f64,
    ) -> Result<Self, ValidationError> {
        let competitor = Self {
            id,
            full_name: full_name.trim().to_string(),
            nickname: nickname.trim().to_string(),
            role,
            handicap,
        };
        competitor.validate()?;
        Ok(competitor)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.full_name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        validate_handicap(self.handicap)
    }

    /// Nickname when one was given, full name otherwise.
    pub fn display_name(&self) -> &str {
        if self.nickname.is_empty() {
            &self.full_name
        } else {
            &self.nickname
        }
    }
}

/// Handicaps must be finite, non-negative and on the half-point grid.
pub fn validate_handicap(handicap: f64) -> Result<(), ValidationError> {
    if !handicap.is_finite() || handicap < 0.0 || (handicap / HANDICAP_STEP).fract() != 0.0 {
        return Err(ValidationError::InvalidHandicap(handicap));
    }
    Ok(())
}

/// Round to the nearest half point.
pub fn snap_handicap(handicap: f64) -> f64 {
    (handicap / HANDICAP_STEP).round() * HANDICAP_STEP
}

// =============================================================================
// Run times
// =============================================================================

/// Result of a single run.
///
/// Serialized as `null`, a number of seconds, or the literal `"SAT"`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RunTime {
    /// No attempt recorded yet.
    #[default]
    Unset,
    /// Elapsed time in seconds.
    Seconds(f64),
    /// No score. Disqualifies the pair.
    NoScore,
}

impl RunTime {
    pub fn is_set(self) -> bool {
        !matches!(self, RunTime::Unset)
    }

    pub fn is_no_score(self) -> bool {
        matches!(self, RunTime::NoScore)
    }

    pub fn seconds(self) -> Option<f64> {
        match self {
            RunTime::Seconds(secs) => Some(secs),
            _ => None,
        }
    }
}

impl fmt::Display for RunTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunTime::Unset => f.write_str("-"),
            RunTime::Seconds(secs) => write!(f, "{:.3}", secs),
            RunTime::NoScore => f.write_str(NO_SCORE),
        }
    }
}

impl Serialize for RunTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RunTime::Unset => serializer.serialize_none(),
            RunTime::Seconds(secs) => serializer.serialize_f64(*secs),
            RunTime::NoScore => serializer.serialize_str(NO_SCORE),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRunTime {
    Seconds(f64),
    Marker(String),
}

impl<'de> Deserialize<'de> for RunTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<RawRunTime>::deserialize(deserializer)? {
            None => Ok(RunTime::Unset),
            Some(RawRunTime::Seconds(secs)) => Ok(RunTime::Seconds(secs)),
            Some(RawRunTime::Marker(marker)) if marker == NO_SCORE => Ok(RunTime::NoScore),
            Some(RawRunTime::Marker(other)) => Err(de::Error::invalid_value(
                de::Unexpected::Str(&other),
                &"a number of seconds, null, or \"SAT\"",
            )),
        }
    }
}

// =============================================================================
// Pairs
// =============================================================================

/// A header/heeler team with its run sheet.
///
/// Competitors are held as snapshots; edits to a competitor reach a pair only
/// through [`Pair::refresh_competitor`]. Run values change only through the
/// ledger operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pair {
    pub(crate) id: PairId,
    pub(crate) head: Competitor,
    pub(crate) heel: Competitor,
    pub(crate) combined_handicap: f64,
    pub(crate) qualifying_runs: Vec<RunTime>,
    pub(crate) final_run: RunTime,
    pub(crate) disqualified: bool,
}

impl Pair {
    /// Build a pair by hand, checking roles and self-pairing.
    pub fn new(head: &Competitor, heel: &Competitor, runs: u32) -> Result<Self, ValidationError> {
        if head.id == heel.id {
            return Err(ValidationError::SelfPairing(head.id));
        }
        if !head.role.can_head() {
            return Err(ValidationError::RoleMismatch {
                name: head.full_name.clone(),
                role: Role::Head,
            });
        }
        if !heel.role.can_heel() {
            return Err(ValidationError::RoleMismatch {
                name: heel.full_name.clone(),
                role: Role::Heel,
            });
        }
        Ok(Self::from_parts(head, heel, runs))
    }

    /// Fresh pair with every slot unset. Callers have already checked eligibility.
    pub(crate) fn from_parts(head: &Competitor, heel: &Competitor, runs: u32) -> Self {
        Self {
            id: PairId::new(),
            head: head.clone(),
            heel: heel.clone(),
            combined_handicap: head.handicap + heel.handicap,
            qualifying_runs: vec![RunTime::Unset; runs.max(1) as usize],
            final_run: RunTime::Unset,
            disqualified: false,
        }
    }

    pub fn id(&self) -> PairId {
        self.id
    }

    pub fn head(&self) -> &Competitor {
        &self.head
    }

    pub fn heel(&self) -> &Competitor {
        &self.heel
    }

    pub fn key(&self) -> PairKey {
        PairKey {
            head: self.head.id,
            heel: self.heel.id,
        }
    }

    pub fn combined_handicap(&self) -> f64 {
        self.combined_handicap
    }

    pub fn qualifying_runs(&self) -> &[RunTime] {
        &self.qualifying_runs
    }

    /// Number of qualifying runs this pair owes.
    pub fn run_quota(&self) -> usize {
        self.qualifying_runs.len()
    }

    pub fn final_run(&self) -> RunTime {
        self.final_run
    }

    pub fn is_disqualified(&self) -> bool {
        self.disqualified
    }

    pub fn contains(&self, id: CompetitorId) -> bool {
        self.head.id == id || self.heel.id == id
    }

    /// True if any competitor appears in both pairs, in either role.
    pub fn shares_competitor(&self, other: &Pair) -> bool {
        other.contains(self.head.id) || other.contains(self.heel.id)
    }

    /// Replace the snapshot of `competitor` if this pair holds it, and
    /// recompute the combined handicap. Returns whether anything changed.
    pub fn refresh_competitor(&mut self, competitor: &Competitor) -> bool {
        let mut touched = false;
        if self.head.id == competitor.id {
            self.head = competitor.clone();
            touched = true;
        }
        if self.heel.id == competitor.id {
            self.heel = competitor.clone();
            touched = true;
        }
        if touched {
            self.combined_handicap = self.head.handicap + self.heel.handicap;
        }
        touched
    }
}

// =============================================================================
// Event settings
// =============================================================================

/// Event-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSettings {
    pub name: String,
    pub date: NaiveDate,
    /// Per-run time limit in seconds.
    pub time_limit: f64,
    /// Highest combined handicap a pair may have.
    pub max_handicap: f64,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            name: "Team Roping".to_string(),
            date: Local::now().date_naive(),
            time_limit: 15.0,
            max_handicap: 7.0,
        }
    }
}

impl EventSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.time_limit.is_finite() && self.time_limit > 0.0) {
            return Err(ValidationError::NonPositiveSetting {
                name: "time limit",
                value: self.time_limit,
            });
        }
        if !(self.max_handicap.is_finite() && self.max_handicap > 0.0) {
            return Err(ValidationError::NonPositiveSetting {
                name: "maximum combined handicap",
                value: self.max_handicap,
            });
        }
        Ok(())
    }
}

/// Partial settings edit; `None` fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub time_limit: Option<f64>,
    pub max_handicap: Option<f64>,
}

/// Partial competitor edit; `None` fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct CompetitorUpdate {
    pub full_name: Option<String>,
    pub nickname: Option<String>,
    pub role: Option<Role>,
    pub handicap: Option<f64>,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
