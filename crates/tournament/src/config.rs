//! Event files
//!
//! An event is described in TOML:
//!
//! ```toml
//! [event]
//! name = "Jackpot de Verão"
//! date = "2026-01-17"
//! time_limit = 15.0
//! max_handicap = 7.0
//!
//! [[rules]]
//! max_handicap = 3.5
//! runs = 1
//!
//! [[competitors]]
//! full_name = "Ana Souza"
//! nickname = "Ana"
//! role = "head"
//! handicap = 2.0
//! ```
//!
//! Every `[event]` field is optional. Without `[[rules]]` the standard table
//! applies. `ROPING_TIME_LIMIT` and `ROPING_MAX_HANDICAP` override the file.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use roping_core::{
    Competition, Competitor, CompetitorId, CompetitorUpdate, EventSettings, HandicapRule,
    HandicapTable, Role, SettingsUpdate, ValidationError,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::env;
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventFile {
    pub event: EventSection,
    pub rules: Vec<RuleEntry>,
    pub competitors: Vec<CompetitorEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventSection {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub time_limit: Option<f64>,
    pub max_handicap: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuleEntry {
    pub max_handicap: f64,
    pub runs: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompetitorEntry {
    /// Derived from the full name when absent.
    pub id: Option<Uuid>,
    pub full_name: String,
    #[serde(default)]
    pub nickname: String,
    pub role: Role,
    pub handicap: f64,
}

/// What changed when a roster was applied to an existing event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RosterChanges {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
}

impl EventFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Settings from the file over the defaults, then environment overrides.
    pub fn settings(&self) -> EventSettings {
        let defaults = EventSettings::default();
        let settings = EventSettings {
            name: self.event.name.clone().unwrap_or(defaults.name),
            date: self.event.date.unwrap_or(defaults.date),
            time_limit: self.event.time_limit.unwrap_or(defaults.time_limit),
            max_handicap: self.event.max_handicap.unwrap_or(defaults.max_handicap),
        };
        apply_overrides(settings, |key| env::var(key).ok())
    }

    pub fn rule_table(&self) -> Result<HandicapTable, ValidationError> {
        if self.rules.is_empty() {
            return Ok(HandicapTable::standard());
        }
        HandicapTable::from_rules(self.rules.iter().map(|r| HandicapRule {
            max_handicap: r.max_handicap,
            runs: r.runs,
        }))
    }

    pub fn roster(&self) -> Result<Vec<Competitor>, ValidationError> {
        self.competitors
            .iter()
            .map(|entry| {
                let id = entry
                    .id
                    .map(CompetitorId)
                    .unwrap_or_else(|| CompetitorId::from_name(&entry.full_name));
                Competitor::with_id(id, &entry.full_name, &entry.nickname, entry.role, entry.handicap)
            })
            .collect()
    }

    /// A fresh competition holding this file's settings, rules and roster.
    pub fn build(&self) -> Result<Competition> {
        let mut competition = Competition::new(self.settings(), self.rule_table()?)?;
        for competitor in self.roster()? {
            let name = competitor.full_name.clone();
            competition
                .insert_competitor(competitor)
                .with_context(|| format!("Competitor {name}"))?;
        }
        Ok(competition)
    }

    /// Bring an existing competition in line with this file: settings and
    /// rules are replaced, the roster is diffed by id. Pairs are not touched
    /// here except that any removal clears them.
    pub fn apply_to(&self, competition: &mut Competition) -> Result<RosterChanges> {
        let settings = self.settings();
        competition.update_settings(SettingsUpdate {
            name: Some(settings.name),
            date: Some(settings.date),
            time_limit: Some(settings.time_limit),
            max_handicap: Some(settings.max_handicap),
        })?;
        competition.set_rules(self.rule_table()?);

        let roster = self.roster()?;
        let wanted: HashSet<CompetitorId> = roster.iter().map(|c| c.id).collect();
        let gone: Vec<CompetitorId> = competition
            .competitors()
            .iter()
            .map(|c| c.id)
            .filter(|id| !wanted.contains(id))
            .collect();

        let mut changes = RosterChanges {
            removed: competition.remove_competitors(&gone),
            ..Default::default()
        };
        if changes.removed > 0 {
            warn!(removed = changes.removed, "competitors left the roster; draw was cleared");
        }

        for competitor in roster {
            match competition.competitor(competitor.id).cloned() {
                Some(current) if current == competitor => {}
                Some(_) => {
                    competition.update_competitor(
                        competitor.id,
                        CompetitorUpdate {
                            full_name: Some(competitor.full_name),
                            nickname: Some(competitor.nickname),
                            role: Some(competitor.role),
                            handicap: Some(competitor.handicap),
                        },
                    )?;
                    changes.updated += 1;
                }
                None => {
                    competition.insert_competitor(competitor)?;
                    changes.added += 1;
                }
            }
        }
        info!(
            added = changes.added,
            updated = changes.updated,
            removed = changes.removed,
            "applied roster"
        );
        Ok(changes)
    }
}

/// Apply `ROPING_TIME_LIMIT` / `ROPING_MAX_HANDICAP` from `lookup`.
/// Unparseable values are ignored with a warning.
pub fn apply_overrides<F>(mut settings: EventSettings, lookup: F) -> EventSettings
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(limit) = parse_override(&lookup, "ROPING_TIME_LIMIT") {
        settings.time_limit = limit;
    }
    if let Some(max) = parse_override(&lookup, "ROPING_MAX_HANDICAP") {
        settings.max_handicap = max;
    }
    settings
}

fn parse_override<F>(lookup: &F, key: &str) -> Option<f64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = raw, "ignoring unparseable override");
            None
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
