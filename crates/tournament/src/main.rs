//! Roping CLI
//!
//! Draw pairs, record runs and print the standings of a team roping event.

use anyhow::{anyhow, bail, Context, Result};
use roping_core::{Competition, PairId, RunEntry, Slot};
use std::env;
use std::path::{Path, PathBuf};
use tournament::{call_order_report, draw_report, load_state, save_state, standings_report, EventFile};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_STATE: &str = "roping_state.json";

fn print_usage() {
    println!("Team roping event runner");
    println!();
    println!("Usage:");
    println!("  roping draw <event.toml>                       - Draw a new pair set");
    println!("  roping update <event.toml>                     - Apply roster changes, keep runs");
    println!("  roping record <pair#> <round|final> <time|sat|clear> [--authorize]");
    println!("  roping lock <round|final>");
    println!("  roping unlock <round|final>");
    println!("  roping order                                   - Final call order");
    println!("  roping standings                               - Final standings");
    println!("  roping check <event.toml>                      - Validate an event file");
    println!();
    println!("Options:");
    println!("  --state FILE   State file (default: {})", DEFAULT_STATE);
    println!("  --authorize    Keep a qualifying time over the limit");
    println!();
    println!("Pairs and rounds are numbered from 1. Set RUST_LOG to change log verbosity.");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Arguments left after pulling out the shared options.
struct Invocation {
    positional: Vec<String>,
    state: PathBuf,
    authorize: bool,
}

fn parse_options(args: &[String]) -> Result<Invocation> {
    let mut positional = Vec::new();
    let mut state = PathBuf::from(DEFAULT_STATE);
    let mut authorize = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--state" | "-s" => {
                let path = args
                    .get(i + 1)
                    .ok_or_else(|| anyhow!("--state needs a file name"))?;
                state = PathBuf::from(path);
                i += 1;
            }
            "--authorize" | "-a" => authorize = true,
            other => positional.push(other.to_string()),
        }
        i += 1;
    }

    Ok(Invocation {
        positional,
        state,
        authorize,
    })
}

fn positional<'a>(inv: &'a Invocation, index: usize, what: &str) -> Result<&'a str> {
    inv.positional
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing {}", what))
}

fn parse_slot(raw: &str) -> Result<Slot> {
    if raw.eq_ignore_ascii_case("final") || raw.eq_ignore_ascii_case("f") {
        return Ok(Slot::Final);
    }
    let round: usize = raw
        .parse()
        .with_context(|| format!("invalid round: {}", raw))?;
    if round == 0 {
        bail!("rounds are numbered from 1");
    }
    Ok(Slot::Qualifying(round - 1))
}

fn parse_entry(raw: &str) -> Result<RunEntry> {
    match raw.to_lowercase().as_str() {
        "sat" | "ns" => Ok(RunEntry::NoScore),
        "clear" | "-" => Ok(RunEntry::Clear),
        // Comma decimals are common on arena scoreboards.
        other => {
            let secs: f64 = other
                .replace(',', ".")
                .parse()
                .with_context(|| format!("invalid time: {}", raw))?;
            Ok(RunEntry::Time(secs))
        }
    }
}

fn pair_at(competition: &Competition, raw: &str) -> Result<PairId> {
    let number: usize = raw
        .parse()
        .with_context(|| format!("invalid pair number: {}", raw))?;
    number
        .checked_sub(1)
        .and_then(|i| competition.pairs().get(i))
        .map(|p| p.id())
        .ok_or_else(|| anyhow!("no pair #{} (drawn: {})", number, competition.pairs().len()))
}

fn report_issues(competition: &Competition) {
    for issue in competition.configuration_issues() {
        eprintln!("Warning: {}", issue);
    }
}

fn run_draw(inv: &Invocation) -> Result<()> {
    let event = EventFile::load(Path::new(positional(inv, 0, "event file")?))?;
    let mut competition = event.build()?;
    report_issues(&competition);
    competition.regenerate_pairs(&mut rand::thread_rng());
    save_state(&competition, &inv.state)?;
    print!("{}", draw_report(&competition));
    Ok(())
}

fn run_update(inv: &Invocation) -> Result<()> {
    let event = EventFile::load(Path::new(positional(inv, 0, "event file")?))?;
    let mut competition = if inv.state.exists() {
        load_state(&inv.state)?
    } else {
        info!(path = %inv.state.display(), "no state file; starting fresh");
        Competition::standard()
    };
    let changes = event.apply_to(&mut competition)?;
    report_issues(&competition);
    competition.update_pairs(&mut rand::thread_rng());
    save_state(&competition, &inv.state)?;
    println!(
        "Roster: {} added, {} updated, {} removed",
        changes.added, changes.updated, changes.removed
    );
    print!("{}", draw_report(&competition));
    Ok(())
}

fn run_record(inv: &Invocation) -> Result<()> {
    let mut competition = load_state(&inv.state)?;
    let pair = pair_at(&competition, positional(inv, 0, "pair number")?)?;
    let slot = parse_slot(positional(inv, 1, "round")?)?;
    let entry = parse_entry(positional(inv, 2, "time")?)?;

    let stored = match slot {
        Slot::Qualifying(round) => {
            if inv.authorize && !competition.is_over_limit_authorized(pair, slot) {
                competition.toggle_over_limit(pair, slot)?;
            }
            competition.record_qualifying_run(pair, round, entry)?
        }
        Slot::Final => competition.record_final_run(pair, entry)?,
    };
    save_state(&competition, &inv.state)?;
    println!("Recorded {} for {}", stored, slot);
    Ok(())
}

fn run_lock(inv: &Invocation, lock: bool) -> Result<()> {
    let mut competition = load_state(&inv.state)?;
    let slot = parse_slot(positional(inv, 0, "round")?)?;
    match (slot, lock) {
        (Slot::Qualifying(round), true) => {
            competition.lock_round(round);
        }
        (Slot::Qualifying(round), false) => {
            competition.unlock_round(round);
        }
        (Slot::Final, true) => competition.lock_final(),
        (Slot::Final, false) => competition.unlock_final(),
    }
    save_state(&competition, &inv.state)?;
    println!("{} {}", if lock { "Locked" } else { "Unlocked" }, slot);
    Ok(())
}

fn run_check(inv: &Invocation) -> Result<()> {
    let event = EventFile::load(Path::new(positional(inv, 0, "event file")?))?;
    let competition = event.build()?;
    let issues = competition.configuration_issues();
    for issue in &issues {
        println!("Warning: {}", issue);
    }
    println!(
        "{}: {} competitors, {} rules, {} issue(s)",
        competition.settings().name,
        competition.competitors().len(),
        competition.rules().rules().len(),
        issues.len()
    );
    Ok(())
}

fn run(command: &str, inv: &Invocation) -> Result<()> {
    match command {
        "draw" => run_draw(inv),
        "update" => run_update(inv),
        "record" => run_record(inv),
        "lock" => run_lock(inv, true),
        "unlock" => run_lock(inv, false),
        "order" => {
            print!("{}", call_order_report(&load_state(&inv.state)?));
            Ok(())
        }
        "standings" => {
            print!("{}", standings_report(&load_state(&inv.state)?));
            Ok(())
        }
        "check" => run_check(inv),
        other => bail!("unknown command: {}", other),
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || matches!(args[1].as_str(), "help" | "--help" | "-h") {
        print_usage();
        return;
    }

    init_tracing();

    let result = parse_options(&args[2..]).and_then(|inv| run(&args[1], &inv));
    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
