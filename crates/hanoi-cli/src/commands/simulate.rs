//! Simulate command
//!
//! Usage: hanoi simulate [--classes <N>] [--rounds <R>] [--json]

use chrono::Utc;
use clap::Args;
use hanoi_core::errors::ExError;
use hanoi_engine::{simulate, SimulationOptions};

use super::{print_json, CliResult, SchemeArgs};

#[derive(Debug, Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub scheme: SchemeArgs,

    /// Number of rotations to run
    #[arg(long, default_value_t = 32)]
    pub rounds: usize,

    /// Hours between two rotations
    #[arg(long, default_value_t = 24)]
    pub interval_hours: i64,

    /// Print the full simulation as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute simulate command
pub fn execute(args: SimulateArgs) -> CliResult {
    let config = args.scheme.config();
    let options = SimulationOptions {
        rounds: args.rounds,
        interval_secs: args.interval_hours.saturating_mul(3600),
        start: Utc::now(),
    };

    let report = simulate(&config, &options).map_err(ExError::from)?;
    if args.json {
        return print_json(&report);
    }

    println!("{:>5}  {:>5}  {:>7}  {:>7}  live", "round", "class", "control", "horizon");
    for round in &report.rounds {
        println!(
            "{:>5}  {:>5}  {:>7}  {:>7}  {}",
            round.round,
            round.class_label,
            round.control_number.value(),
            round.horizon,
            round.live
        );
    }
    println!("schedule: {}", report.schedule());
    println!(
        "at most {} snapshots live with {} classes",
        report.max_live(),
        report.class_count
    );
    Ok(())
}
