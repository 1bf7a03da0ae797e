//! tars-replay: headless playback of scripted or synthetic threat scenarios.
//!
//! Usage:
//!   tars-replay run --scenario scenarios/raid.json [--config tars.json]
//!   tars-replay synthetic --seed 7 --ticks 120 --contacts 6

use std::path::PathBuf;
use std::process;

use chrono::Utc;
use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tars_core::config::ThreatConfig;
use tars_core::constants::TICK_INTERVAL_MS;
use tars_core::enums::{ContactKind, Relationship};
use tars_core::types::ContactSnapshot;
use tars_engine::scripted::{run_scenario, Scenario, ScenarioOutcome, ScriptedContact, ScriptedFrame};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "synthetic" => cmd_synthetic(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

/// Log to stderr. `RUST_LOG` overrides the default `info` filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage() {
    eprintln!(
        "tars-replay: threat assessment scenario playback\n\
         \n\
         Commands:\n\
         \n\
         run        Play a scenario file through the assessment engine\n\
         \n\
           --scenario <path>  Scenario JSON file\n\
           --config <path>    Threat config JSON (optional, default: built-in)\n\
         \n\
         synthetic  Generate and play a random inbound raid\n\
         \n\
           --seed <N>         RNG seed (default: 1)\n\
           --ticks <N>        Number of ticks (default: 60)\n\
           --contacts <N>     Number of contacts (default: 4)\n\
           --config <path>    Threat config JSON (optional)\n\
         \n\
         Set RUST_LOG=debug for per-contact scoring output.\n"
    );
}

fn parse_flag<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn parse_number<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    parse_flag(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn load_config(args: &[String]) -> ThreatConfig {
    let Some(path) = parse_flag(args, "--config") else {
        return ThreatConfig::default();
    };
    match ThreatConfig::from_json_file(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config {path}: {e}");
            process::exit(1);
        }
    }
}

// --- Run command ---

fn cmd_run(args: &[String]) {
    let path = match parse_flag(args, "--scenario") {
        Some(p) => PathBuf::from(p),
        None => {
            eprintln!("Error: --scenario <path> is required");
            process::exit(1);
        }
    };
    let config = load_config(args);

    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Error reading {}: {e}", path.display());
            process::exit(1);
        }
    };
    let scenario: Scenario = match serde_json::from_str(&raw) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error parsing {}: {e}", path.display());
            process::exit(1);
        }
    };

    info!(name = %scenario.name, frames = scenario.frames.len(), "playing scenario");
    let outcome = run_scenario(&scenario, config, Utc::now());
    print_outcome(&outcome);
}

// --- Synthetic command ---

fn cmd_synthetic(args: &[String]) {
    let seed: u64 = parse_number(args, "--seed", 1);
    let ticks: usize = parse_number(args, "--ticks", 60);
    let contacts: usize = parse_number(args, "--contacts", 4);
    let config = load_config(args);

    info!(seed, ticks, contacts, "generating synthetic raid");
    let scenario = synthetic_raid(seed, ticks, contacts);
    let outcome = run_scenario(&scenario, config, Utc::now());
    print_outcome(&outcome);
}

/// Contacts spawn on a ring around the observer and close at varied speeds and
/// headings. Hull damage lands at random once any contact is within 2 km.
fn synthetic_raid(seed: u64, ticks: usize, count: usize) -> Scenario {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let dt = TICK_INTERVAL_MS as f64 / 1000.0;

    let mut contacts: Vec<ScriptedContact> = (0..count)
        .map(|i| {
            let bearing = rng.gen_range(0.0..std::f64::consts::TAU);
            let range = rng.gen_range(3000.0..15000.0);
            let position = DVec3::new(bearing.cos() * range, rng.gen_range(-500.0..500.0), bearing.sin() * range);
            let heading_error = rng.gen_range(-0.6..0.6);
            let heading = DVec3::new(
                -(bearing + heading_error).cos(),
                0.0,
                -(bearing + heading_error).sin(),
            );
            let speed = rng.gen_range(40.0..400.0);
            let (kind, rating) = match rng.gen_range(0..3) {
                0 => (ContactKind::LargePlatform, rng.gen_range(20.0..75.0)),
                1 => (ContactKind::SmallPlatform, rng.gen_range(2.0..20.0)),
                _ => (ContactKind::GuidedMunition, rng.gen_range(0.5..5.0)),
            };
            let relationship = if rng.gen_bool(0.8) {
                Relationship::Hostile
            } else {
                Relationship::Neutral
            };
            ScriptedContact {
                contact: ContactSnapshot::new(i as i64 + 100, format!("Track {}", i + 1), position, heading * speed)
                    .with_relationship(relationship)
                    .with_kind(kind),
                rating,
                effective_dps: rating * 2.0,
            }
        })
        .collect();

    let mut hull_damage = 0.0;
    let mut frames = Vec::with_capacity(ticks);
    for _ in 0..ticks {
        let danger_close = contacts.iter().any(|c| c.contact.position.length() < 2000.0);
        let damage = if danger_close && rng.gen_bool(0.1) {
            hull_damage += rng.gen_range(5.0..50.0);
            Some(hull_damage)
        } else {
            None
        };
        frames.push(ScriptedFrame {
            contacts: contacts.clone(),
            hull_damage: damage,
            ..ScriptedFrame::default()
        });
        for c in &mut contacts {
            c.contact.position += c.contact.velocity * dt;
        }
    }

    Scenario {
        name: format!("synthetic-{seed}"),
        observer: DVec3::ZERO,
        own_optimal_dps: 120.0,
        capacity_max: None,
        failed_activations: 0,
        turrets: Vec::new(),
        frames,
    }
}

fn print_outcome(outcome: &ScenarioOutcome) {
    for report in &outcome.reports {
        if !report.is_assessed() {
            warn!(tick = report.tick, status = ?report.status, "tick not assessed");
            continue;
        }
        println!(
            "tick {:>4}  {}  aggregate {:>7.3}  contacts {:>2}{}",
            report.tick,
            report.condition,
            report.aggregate,
            report.contacts.len(),
            if report.logged { "  *" } else { "" }
        );
    }
    println!("\nBroadcasts: {}", outcome.broadcasts.len());
    println!("\n{}", outcome.status_text);
    println!("Event log:\n{}", outcome.log_text);
}
