//! Team roping event runner
//!
//! This crate wraps the `roping_core` engine with:
//! - TOML event files (settings, rule table, roster)
//! - JSON state files holding the live draw between commands
//! - Text reports for the draw, the final call order and the standings
//!
//! # Usage
//!
//! ```bash
//! # Draw pairs from an event file
//! cargo run -p roping_tournament -- draw event.toml
//!
//! # Record pair 3's second qualifying run
//! cargo run -p roping_tournament -- record 3 2 9.84
//! ```

mod config;
mod results;

pub use config::*;
pub use results::*;
