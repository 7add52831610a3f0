//! The mutable event context owned by the caller.
//!
//! Every engine operation in this crate is a function over data handed to
//! it; `Competition` holds that data and applies each edit as one step, so a
//! caller never observes a half-updated pair set. Lock checks and the
//! over-limit entry policy are enforced here, at the edit boundary.

use std::collections::HashMap;

use chrono::Utc;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::error::{ConfigurationError, SnapshotError, ValidationError};
use crate::handicap::HandicapTable;
use crate::ledger::{RoundLocks, RunEntry, Slot};
use crate::pairing::{generate_pairs, CompetitorPools};
use crate::ranking::{final_call_order, rank, Standing};
use crate::reconcile::reconcile_pairs;
use crate::sequencer::sequence_pairs;
use crate::snapshot::Snapshot;
use crate::types::{
    snap_handicap, Competitor, CompetitorId, CompetitorUpdate, EventSettings, Pair, PairId, Role,
    RunTime, SettingsUpdate, HANDICAP_STEP,
};

#[derive(Debug, Clone, Default)]
pub struct Competition {
    settings: EventSettings,
    rules: HandicapTable,
    competitors: Vec<Competitor>,
    pairs: Vec<Pair>,
    locks: RoundLocks,
    /// Explicit over-limit toggles per slot. Input-layer state, never persisted.
    over_limit: HashMap<(PairId, Slot), bool>,
}

impl Competition {
    pub fn new(settings: EventSettings, rules: HandicapTable) -> Result<Self, ValidationError> {
        settings.validate()?;
        Ok(Self {
            settings,
            rules,
            ..Self::default()
        })
    }

    /// Default settings with the standard rule table.
    pub fn standard() -> Self {
        Self {
            rules: HandicapTable::standard(),
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &EventSettings {
        &self.settings
    }

    pub fn rules(&self) -> &HandicapTable {
        &self.rules
    }

    pub fn competitors(&self) -> &[Competitor] {
        &self.competitors
    }

    pub fn competitor(&self, id: CompetitorId) -> Option<&Competitor> {
        self.competitors.iter().find(|c| c.id == id)
    }

    /// Pairs in draw order.
    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    pub fn pair(&self, id: PairId) -> Option<&Pair> {
        self.pairs.iter().find(|p| p.id() == id)
    }

    fn pair_mut(&mut self, id: PairId) -> Result<&mut Pair, ValidationError> {
        self.pairs
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or(ValidationError::UnknownPair(id))
    }

    pub fn locks(&self) -> &RoundLocks {
        &self.locks
    }

    // =========================================================================
    // Settings and rules
    // =========================================================================

    pub fn update_settings(&mut self, update: SettingsUpdate) -> Result<(), ValidationError> {
        let mut next = self.settings.clone();
        if let Some(name) = update.name {
            next.name = name;
        }
        if let Some(date) = update.date {
            next.date = date;
        }
        if let Some(limit) = update.time_limit {
            next.time_limit = limit;
        }
        if let Some(max) = update.max_handicap {
            next.max_handicap = max;
        }
        next.validate()?;
        self.settings = next;
        Ok(())
    }

    pub fn add_rule(&mut self, max_handicap: f64, runs: u32) -> Result<(), ValidationError> {
        self.rules.add_rule(max_handicap, runs)
    }

    pub fn remove_rule(&mut self, max_handicap: f64) -> bool {
        self.rules.remove_rule(max_handicap).is_some()
    }

    /// Swap in a whole rule table. Existing quotas change on the next
    /// reconciliation or regeneration.
    pub fn set_rules(&mut self, rules: HandicapTable) {
        self.rules = rules;
    }

    /// Problems with the rule table for the current settings.
    pub fn configuration_issues(&self) -> Vec<ConfigurationError> {
        match self.rules.coverage(self.settings.max_handicap) {
            Ok(()) => Vec::new(),
            Err(err) => vec![err],
        }
    }

    // =========================================================================
    // Roster
    // =========================================================================

    pub fn add_competitor(
        &mut self,
        full_name: &str,
        nickname: &str,
        role: Role,
        handicap: f64,
    ) -> Result<CompetitorId, ValidationError> {
        let competitor = Competitor::new(full_name, nickname, role, handicap)?;
        let id = competitor.id;
        self.insert_competitor(competitor)?;
        Ok(id)
    }

    /// Register a competitor that already carries an id.
    pub fn insert_competitor(&mut self, competitor: Competitor) -> Result<(), ValidationError> {
        competitor.validate()?;
        if self.competitor(competitor.id).is_some() {
            return Err(ValidationError::DuplicateCompetitor(competitor.id));
        }
        debug!(name = %competitor.full_name, role = %competitor.role, "registered competitor");
        self.competitors.push(competitor);
        Ok(())
    }

    /// Edit a competitor and push the new snapshot into every pair holding
    /// them. Returns the number of pairs touched. Run quotas are left alone
    /// until the next reconciliation.
    pub fn update_competitor(
        &mut self,
        id: CompetitorId,
        update: CompetitorUpdate,
    ) -> Result<usize, ValidationError> {
        let current = self
            .competitor(id)
            .ok_or(ValidationError::UnknownCompetitor(id))?;
        let mut next = current.clone();
        if let Some(name) = update.full_name {
            next.full_name = name.trim().to_string();
        }
        if let Some(nickname) = update.nickname {
            next.nickname = nickname.trim().to_string();
        }
        if let Some(role) = update.role {
            next.role = role;
        }
        if let Some(handicap) = update.handicap {
            next.handicap = handicap;
        }
        next.validate()?;

        let mut touched = 0;
        for pair in &mut self.pairs {
            if pair.refresh_competitor(&next) {
                touched += 1;
            }
        }
        if let Some(slot) = self.competitors.iter_mut().find(|c| c.id == id) {
            *slot = next;
        }
        debug!(%id, pairs = touched, "updated competitor");
        Ok(touched)
    }

    /// Move a handicap by `delta`, snapped to the half-point grid. A step
    /// landing below one half point is refused. Returns the new handicap.
    pub fn step_handicap(&mut self, id: CompetitorId, delta: f64) -> Result<f64, ValidationError> {
        let current = self
            .competitor(id)
            .ok_or(ValidationError::UnknownCompetitor(id))?
            .handicap;
        let next = snap_handicap(current + delta);
        if next < HANDICAP_STEP {
            return Err(ValidationError::InvalidHandicap(next));
        }
        self.update_competitor(
            id,
            CompetitorUpdate {
                handicap: Some(next),
                ..Default::default()
            },
        )?;
        Ok(next)
    }

    /// Remove competitors. Any removal invalidates the pair set, so pairs
    /// and locks are cleared. Returns how many competitors were removed.
    pub fn remove_competitors(&mut self, ids: &[CompetitorId]) -> usize {
        if ids.is_empty() {
            return 0;
        }
        let before = self.competitors.len();
        self.competitors.retain(|c| !ids.contains(&c.id));
        let removed = before - self.competitors.len();
        if !self.pairs.is_empty() {
            warn!(removed, pairs = self.pairs.len(), "roster shrank; pair set cleared");
        }
        self.clear_pairs();
        removed
    }

    fn clear_pairs(&mut self) {
        self.pairs.clear();
        self.locks.clear();
        self.over_limit.clear();
    }

    // =========================================================================
    // Pair set
    // =========================================================================

    /// Throw away the pair set and draw a new one. Clears every lock.
    pub fn regenerate_pairs<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &[Pair] {
        let pools = CompetitorPools::from_roster(&self.competitors);
        let fresh = generate_pairs(&pools, &self.rules, self.settings.max_handicap);
        let drawn = sequence_pairs(fresh, rng);
        self.clear_pairs();
        self.pairs = drawn;
        info!(pairs = self.pairs.len(), "drew new pair set");
        &self.pairs
    }

    /// Bring the pair set in line with the roster, keeping recorded runs.
    /// Locks are kept.
    pub fn update_pairs<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &[Pair] {
        let pools = CompetitorPools::from_roster(&self.competitors);
        let existing = std::mem::take(&mut self.pairs);
        self.pairs = reconcile_pairs(
            existing,
            &pools,
            &self.rules,
            self.settings.max_handicap,
            rng,
        );
        let pairs = &self.pairs;
        self.over_limit
            .retain(|(id, _), _| pairs.iter().any(|p| p.id() == *id));
        info!(pairs = self.pairs.len(), "updated pair set");
        &self.pairs
    }

    // =========================================================================
    // Run entry
    // =========================================================================

    /// Whether an over-limit time typed into `slot` is kept as a time.
    ///
    /// The final is always authorized. Otherwise an explicit toggle wins;
    /// without one, a slot already holding an over-limit time counts as
    /// authorized.
    pub fn is_over_limit_authorized(&self, pair_id: PairId, slot: Slot) -> bool {
        if slot == Slot::Final {
            return true;
        }
        if let Some(&toggled) = self.over_limit.get(&(pair_id, slot)) {
            return toggled;
        }
        self.pair(pair_id)
            .and_then(|p| p.run(slot))
            .and_then(RunTime::seconds)
            .is_some_and(|secs| secs > self.settings.time_limit)
    }

    /// Flip the over-limit toggle for a slot; returns the new state. Refused
    /// on a locked round. The final stays authorized.
    pub fn toggle_over_limit(&mut self, pair_id: PairId, slot: Slot) -> Result<bool, ValidationError> {
        self.locks.check(slot)?;
        let pair = self.pair(pair_id).ok_or(ValidationError::UnknownPair(pair_id))?;
        let round = match slot {
            Slot::Final => return Ok(true),
            Slot::Qualifying(round) => round,
        };
        if pair.run(slot).is_none() {
            return Err(ValidationError::RoundOutOfRange {
                round,
                runs: pair.run_quota(),
            });
        }
        let next = !self.is_over_limit_authorized(pair_id, slot);
        self.over_limit.insert((pair_id, slot), next);
        Ok(next)
    }

    /// Record a qualifying run through the edit boundary. Returns the value
    /// actually stored.
    pub fn record_qualifying_run(
        &mut self,
        pair_id: PairId,
        round: usize,
        entry: RunEntry,
    ) -> Result<RunTime, ValidationError> {
        let slot = Slot::Qualifying(round);
        self.locks.check(slot)?;
        let authorized = self.is_over_limit_authorized(pair_id, slot);
        let limit = self.settings.time_limit;
        let value = entry.resolve(limit, authorized)?;

        let pair = self.pair_mut(pair_id)?;
        pair.set_qualifying_run(round, value)?;
        let disqualified = pair.is_disqualified();

        if let RunEntry::Time(secs) = entry {
            if value.is_no_score() {
                warn!(%pair_id, %slot, secs, limit, "time over limit recorded as no score");
            }
        }
        if entry == RunEntry::Clear {
            self.over_limit.remove(&(pair_id, slot));
        }
        info!(%pair_id, %slot, %value, disqualified, "recorded run");
        Ok(value)
    }

    /// Record the final run. Over-limit times are always kept.
    pub fn record_final_run(&mut self, pair_id: PairId, entry: RunEntry) -> Result<RunTime, ValidationError> {
        self.locks.check(Slot::Final)?;
        let value = entry.resolve(self.settings.time_limit, true)?;
        let pair = self.pair_mut(pair_id)?;
        pair.set_final_run(value)?;
        let disqualified = pair.is_disqualified();
        info!(%pair_id, slot = %Slot::Final, %value, disqualified, "recorded run");
        Ok(value)
    }

    // =========================================================================
    // Locks
    // =========================================================================

    pub fn lock_round(&mut self, round: usize) -> bool {
        let changed = self.locks.lock_round(round);
        info!(round = round + 1, "locked round");
        changed
    }

    pub fn unlock_round(&mut self, round: usize) -> bool {
        let changed = self.locks.unlock_round(round);
        info!(round = round + 1, "unlocked round");
        changed
    }

    pub fn toggle_round_lock(&mut self, round: usize) -> bool {
        let locked = self.locks.toggle_round(round);
        info!(round = round + 1, locked, "toggled round lock");
        locked
    }

    pub fn lock_final(&mut self) {
        self.locks.lock_final();
        info!("locked final");
    }

    pub fn unlock_final(&mut self) {
        self.locks.unlock_final();
        info!("unlocked final");
    }

    pub fn toggle_final_lock(&mut self) -> bool {
        let locked = self.locks.toggle_final();
        info!(locked, "toggled final lock");
        locked
    }

    // =========================================================================
    // Standings
    // =========================================================================

    pub fn final_call_order(&self) -> Vec<Standing<'_>> {
        final_call_order(&self.pairs)
    }

    pub fn standings(&self) -> Vec<Standing<'_>> {
        rank(&self.pairs)
    }

    /// Start over: no roster, no pairs, default settings. Rules are kept.
    pub fn reset(&mut self) {
        self.competitors.clear();
        self.clear_pairs();
        self.settings = EventSettings::default();
        info!("competition reset");
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            settings: self.settings.clone(),
            handicap_rules: self.rules.rules().to_vec(),
            competitors: self.competitors.clone(),
            pairs: self.pairs.clone(),
            locked_rounds: self.locks.locked_rounds(),
            final_locked: self.locks.is_final_locked(),
            exported_at: Some(Utc::now()),
        }
    }

    /// Replace the whole state with a snapshot. Nothing is reconciled. On
    /// error the current state is untouched.
    pub fn restore(&mut self, snapshot: Snapshot) -> Result<(), SnapshotError> {
        *self = Self::from_snapshot(snapshot)?;
        Ok(())
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, SnapshotError> {
        let rules = snapshot.validate()?;
        let competition = Self {
            settings: snapshot.settings,
            rules,
            competitors: snapshot.competitors,
            pairs: snapshot.pairs,
            locks: RoundLocks::from_parts(snapshot.locked_rounds, snapshot.final_locked),
            over_limit: HashMap::new(),
        };
        info!(
            competitors = competition.competitors.len(),
            pairs = competition.pairs.len(),
            "restored snapshot"
        );
        Ok(competition)
    }
}

#[cfg(test)]
#[path = "competition_tests.rs"]
mod competition_tests;
