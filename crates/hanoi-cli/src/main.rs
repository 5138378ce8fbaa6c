//! Hanoi CLI
//!
//! Tower-of-Hanoi snapshot rotation for ZFS datasets

use clap::{Parser, Subcommand};
use hanoi_core::logging_facility::{init_with_filter, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "hanoi")]
#[command(about = "Hanoi - Tower-of-Hanoi snapshot rotation for ZFS", long_about = None)]
struct Cli {
    /// Log output: text or json (logs go to stderr)
    #[arg(long, global = true, env = "HANOI_LOG", default_value = "text")]
    log: String,

    /// Explicit tracing filter, e.g. `hanoi=trace` (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_filter: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Take a new generation and retire the superseded one
    Rotate(commands::rotate::RotateArgs),
    /// Show what the next rotation would do, without writing
    Plan(commands::plan::PlanArgs),
    /// Show the current rotation history of a dataset
    Status(commands::status::StatusArgs),
    /// Run the schedule against an in-memory store
    Simulate(commands::simulate::SimulateArgs),
}

fn main() {
    let cli = Cli::parse();

    let profile = match Profile::parse(&cli.log) {
        Some(profile) => profile,
        None => {
            eprintln!("Error: unknown log format '{}' (expected text or json)", cli.log);
            std::process::exit(1);
        }
    };
    init_with_filter(profile, cli.log_filter.as_deref());

    let result = match cli.command {
        Commands::Rotate(args) => commands::rotate::execute(args),
        Commands::Plan(args) => commands::plan::execute(args),
        Commands::Status(args) => commands::status::execute(args),
        Commands::Simulate(args) => commands::simulate::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
