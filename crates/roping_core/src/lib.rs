//! Team roping tournament engine
//!
//! This crate provides the pairing, scheduling and scoring core of a
//! head-and-heel roping jackpot:
//! - Handicap rules deciding how many qualifying runs a pair owes
//! - Pair generation under a combined-handicap ceiling
//! - A draw order that rests ropers between runs
//! - A run-time ledger with round locks and the no-score marker
//! - Qualifying/final averages and standings
//! - Reconciliation of an existing draw after roster edits
//!
//! # Usage
//!
//! ```
//! use roping_core::{Competition, Role, RunEntry};
//!
//! let mut competition = Competition::standard();
//! competition.add_competitor("Ana Souza", "Ana", Role::Head, 2.0).unwrap();
//! competition.add_competitor("Bruno Lima", "Bruno", Role::Heel, 2.0).unwrap();
//! competition.regenerate_pairs(&mut rand::thread_rng());
//!
//! let pair = competition.pairs()[0].id();
//! competition.record_qualifying_run(pair, 0, RunEntry::Time(9.2)).unwrap();
//! ```

pub mod competition;
pub mod error;
pub mod handicap;
pub mod ledger;
pub mod pairing;
pub mod ranking;
pub mod reconcile;
pub mod sequencer;
pub mod snapshot;
pub mod types;

pub use competition::Competition;
pub use error::*;
pub use handicap::*;
pub use ledger::*;
pub use pairing::*;
pub use ranking::*;
pub use reconcile::*;
pub use sequencer::*;
pub use snapshot::Snapshot;
pub use types::*;
