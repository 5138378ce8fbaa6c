//! Rotate command
//!
//! Usage: hanoi rotate --dataset <DATASET> [--recursive] [--dry-run] [--json]

use std::path::PathBuf;

use chrono::Utc;
use clap::Args;
use hanoi_core::core_types::RunContext;
use hanoi_core::errors::ExError;
use hanoi_engine::{
    rotate_dataset, rotate_hierarchy, DatasetRotation, RotationOptions, RotationReport,
};
use hanoi_store::RunLock;

use super::{print_json, CliResult, SchemeArgs, TargetArgs};

#[derive(Debug, Args)]
pub struct RotateArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[command(flatten)]
    pub scheme: SchemeArgs,

    /// Snapshot the dataset and all descendants atomically, then rotate each
    #[arg(long)]
    pub recursive: bool,

    /// Report what would happen without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Directory for the run lock, one per pool (no lock when omitted)
    #[arg(long)]
    pub lock_dir: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute rotate command
pub fn execute(args: RotateArgs) -> CliResult {
    let config = args.scheme.config();
    let mut store = args.target.store();
    let dataset = args.target.dataset.as_str();

    let _lock = match (&args.lock_dir, args.dry_run) {
        (Some(dir), false) => Some(RunLock::acquire(dir, dataset).map_err(ExError::from)?),
        _ => None,
    };

    let options = RotationOptions {
        dry_run: args.dry_run,
        context: RunContext::new().with_origin("cli.rotate"),
    };
    let now = Utc::now();

    let report = if args.recursive {
        rotate_hierarchy(&mut store, dataset, &config, &options, now)
    } else {
        rotate_dataset(&mut store, dataset, &config, &options, now)
    }
    .map_err(ExError::from)?;

    if args.json {
        print_json(&report)?;
    } else {
        print_report(&report);
    }

    if report.is_clean() {
        Ok(())
    } else {
        Err(format!(
            "rotation of {} finished with failures (run {})",
            report.root, report.run_id
        )
        .into())
    }
}

/// Human-readable rendering of a run report
pub fn print_report(report: &RotationReport) {
    let mode = if report.dry_run { "Plan" } else { "Rotation" };
    println!("{} of {} (tag {}, run {}):", mode, report.root, report.tag, report.run_id);

    for entry in &report.datasets {
        match entry {
            DatasetRotation::Rotated(outcome) => {
                println!(
                    "  {}: class {} (control {}), destroyed {}",
                    outcome.dataset,
                    outcome.class.label,
                    outcome.control_number,
                    outcome.destroyed.len()
                );
                for old in &outcome.destroyed {
                    println!("    destroyed {}", old);
                }
                for failure in &outcome.destroy_failures {
                    println!(
                        "    FAILED to destroy {}: [{}] {}",
                        failure.snapshot, failure.code, failure.message
                    );
                }
            }
            DatasetRotation::Planned(plan) => {
                println!(
                    "  {}: would assign class {} (control {}) to {}",
                    plan.dataset, plan.class.label, plan.control_number, plan.snapshot
                );
                for old in &plan.obsolete {
                    println!("    would destroy {}", old);
                }
            }
            DatasetRotation::Failed {
                dataset,
                code,
                error,
            } => {
                println!("  {}: FAILED [{}] {}", dataset, code, error);
            }
        }
    }
}
