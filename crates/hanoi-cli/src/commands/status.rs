//! Status command
//!
//! Usage: hanoi status --dataset <DATASET> [--json]

use chrono::DateTime;
use clap::Args;
use hanoi_core::errors::ExError;
use hanoi_engine::status;

use super::{print_json, CliResult, SchemeArgs, TargetArgs};

#[derive(Debug, Args)]
pub struct StatusArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[command(flatten)]
    pub scheme: SchemeArgs,

    /// Print the status as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute status command
pub fn execute(args: StatusArgs) -> CliResult {
    let config = args.scheme.config();
    let store = args.target.store();

    let current = status(&store, &args.target.dataset, &config).map_err(ExError::from)?;
    if args.json {
        return print_json(&current);
    }

    println!(
        "{}: {} of {} classes in use, next rotation replaces {}",
        current.dataset,
        current.history.len() - current.unclassified,
        current.class_count,
        current.next_class.label
    );
    for entry in &current.history {
        let created = entry
            .creation
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        let class = entry
            .class_label
            .map(|l| l.to_string())
            .unwrap_or_else(|| "?".to_string());
        let control = entry
            .control_number
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("  {}  {:>2}  {:>4}  {}", created, class, control, entry.id);
    }
    Ok(())
}
