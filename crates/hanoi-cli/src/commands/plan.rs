//! Plan command
//!
//! Usage: hanoi plan --dataset <DATASET> [--recursive] [--json]

use chrono::Utc;
use clap::Args;
use hanoi_core::core_types::RunContext;
use hanoi_core::errors::ExError;
use hanoi_engine::{plan_dataset, rotate_hierarchy, RotationOptions};

use super::rotate::print_report;
use super::{print_json, CliResult, SchemeArgs, TargetArgs};

#[derive(Debug, Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[command(flatten)]
    pub scheme: SchemeArgs,

    /// Plan every descendant as a recursive rotation would
    #[arg(long)]
    pub recursive: bool,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute plan command
pub fn execute(args: PlanArgs) -> CliResult {
    let config = args.scheme.config();
    let mut store = args.target.store();
    let dataset = args.target.dataset.as_str();
    let now = Utc::now();

    if args.recursive {
        let options = RotationOptions {
            dry_run: true,
            context: RunContext::new().with_origin("cli.plan"),
        };
        let report =
            rotate_hierarchy(&mut store, dataset, &config, &options, now).map_err(ExError::from)?;
        if args.json {
            return print_json(&report);
        }
        print_report(&report);
        return Ok(());
    }

    let plan = plan_dataset(&store, dataset, &config, now).map_err(ExError::from)?;
    if args.json {
        return print_json(&plan);
    }

    println!("Plan for {}:", plan.dataset);
    println!("  snapshot:       {}", plan.snapshot);
    println!("  rotation point: {}", plan.rotation_point);
    println!("  class:          {}", plan.class.label);
    println!("  control number: {}", plan.control_number);
    if plan.bootstrap {
        println!("  (empty history, starting at the last class)");
    }
    for old in &plan.obsolete {
        println!("  would destroy   {}", old);
    }
    Ok(())
}
