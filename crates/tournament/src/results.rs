//! Event state storage and reporting

use anyhow::{Context, Result};
use roping_core::{
    back_to_back_count, final_average, qualifying_average, Competition, Pair, RunTime, Snapshot,
    Standing,
};
use std::path::Path;
use tracing::debug;

/// Write the competition to a JSON state file.
pub fn save_state(competition: &Competition, path: &Path) -> Result<()> {
    let json = competition
        .snapshot()
        .to_json()
        .context("Failed to serialize state")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    debug!(path = %path.display(), "saved state");
    Ok(())
}

/// Load a competition from a JSON state file.
pub fn load_state(path: &Path) -> Result<Competition> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let snapshot = Snapshot::from_json(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Competition::from_snapshot(snapshot)
        .with_context(|| format!("Inconsistent state in {}", path.display()))
}

fn pair_label(pair: &Pair) -> String {
    format!("{} / {}", pair.head().display_name(), pair.heel().display_name())
}

fn runs_cell(runs: &[RunTime]) -> String {
    runs.iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(" / ")
}

fn average_cell(average: Option<f64>) -> String {
    match average {
        Some(avg) => format!("{:.3}", avg),
        None => "-".to_string(),
    }
}

fn header(competition: &Competition, title: &str) -> String {
    let settings = competition.settings();
    format!(
        "=== {}: {} ({}) ===\n\n",
        title,
        settings.name,
        settings.date.format("%d/%m/%Y")
    )
}

/// Every pair in draw order with its runs so far.
pub fn draw_report(competition: &Competition) -> String {
    let mut report = header(competition, "Draw");
    let settings = competition.settings();
    report.push_str(&format!(
        "Time limit: {:.1}s  Max handicap: {:.1}  Pairs: {}  Back-to-back: {}\n\n",
        settings.time_limit,
        settings.max_handicap,
        competition.pairs().len(),
        back_to_back_count(competition.pairs())
    ));

    report.push_str(&format!(
        "{:>3}  {:<32} {:>5} {:>4}  {:<28} {:>8} {:>9}\n",
        "#", "Pair", "HC", "Runs", "Qualifying", "Final", "Avg"
    ));
    report.push_str(&"-".repeat(96));
    report.push('\n');

    for (i, pair) in competition.pairs().iter().enumerate() {
        let flag = if pair.is_disqualified() { " DQ" } else { "" };
        report.push_str(&format!(
            "{:>3}  {:<32} {:>5.1} {:>4}  {:<28} {:>8} {:>9}{}\n",
            i + 1,
            pair_label(pair),
            pair.combined_handicap(),
            pair.run_quota(),
            runs_cell(pair.qualifying_runs()),
            pair.final_run().to_string(),
            average_cell(qualifying_average(pair)),
            flag
        ));
    }

    let locked = competition.locks().locked_rounds();
    if !locked.is_empty() || competition.locks().is_final_locked() {
        let mut parts: Vec<String> = locked.iter().map(|r| format!("round {}", r + 1)).collect();
        if competition.locks().is_final_locked() {
            parts.push("final".to_string());
        }
        report.push_str(&format!("\nLocked: {}\n", parts.join(", ")));
    }

    report
}

fn standings_table(standings: &[Standing<'_>], average_title: &str) -> String {
    let mut table = format!(
        "{:>5}  {:<32} {:>5}  {:<28} {:>8} {:>9}\n",
        "Place", "Pair", "HC", "Qualifying", "Final", average_title
    );
    table.push_str(&"-".repeat(94));
    table.push('\n');
    for standing in standings {
        let pair = standing.pair;
        table.push_str(&format!(
            "{:>5}  {:<32} {:>5.1}  {:<28} {:>8} {:>9.3}\n",
            standing.place,
            pair_label(pair),
            pair.combined_handicap(),
            runs_cell(pair.qualifying_runs()),
            pair.final_run().to_string(),
            standing.average
        ));
    }
    table
}

/// Finalists in the order they are called, slowest average first.
pub fn call_order_report(competition: &Competition) -> String {
    let mut report = header(competition, "Final call order");
    let order = competition.final_call_order();
    if order.is_empty() {
        report.push_str("No pair has finished qualifying clean.\n");
        return report;
    }
    report.push_str(&standings_table(&order, "Qual avg"));
    report
}

/// Final standings, fastest average over all runs first.
pub fn standings_report(competition: &Competition) -> String {
    let mut report = header(competition, "Standings");
    let standings = competition.standings();
    if standings.is_empty() {
        report.push_str("No pair has a complete set of times.\n");
    } else {
        report.push_str(&standings_table(&standings, "Average"));
    }

    let out: Vec<String> = competition
        .pairs()
        .iter()
        .filter(|p| final_average(p).is_none())
        .map(|p| {
            if p.is_disqualified() {
                format!("{} ({})", pair_label(p), roping_core::NO_SCORE)
            } else {
                format!("{} (incomplete)", pair_label(p))
            }
        })
        .collect();
    if !out.is_empty() {
        report.push_str(&format!("\nNot ranked: {}\n", out.join(", ")));
    }
    report
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod results_tests;
