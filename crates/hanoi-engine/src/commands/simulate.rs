//! Rotation simulation
//!
//! Runs the single-dataset orchestrator repeatedly against a fresh
//! [`MemoryStore`] so the schedule for a class count can be inspected
//! without touching a pool.

use std::collections::HashMap;
use std::time::Instant;

use chrono::{DateTime, TimeDelta, Utc};
use hanoi_core::config::RotationConfig;
use hanoi_core::errors::{HanoiError, Result};
use hanoi_core::model::{ControlNumber, SnapshotId};
use hanoi_core::rotation::load_state;
use hanoi_core::{log_op_end, log_op_error, log_op_start};
use hanoi_store::MemoryStore;
use serde::{Deserialize, Serialize};

use crate::commands::rotate::{rotate_dataset, RotationOptions};
use crate::report::DatasetRotation;

/// Dataset name used inside the simulated store
pub const SIMULATION_DATASET: &str = "pool/data";

#[derive(Debug, Clone)]
pub struct SimulationOptions {
    pub rounds: usize,
    /// Seconds between two rotations
    pub interval_secs: i64,
    /// Clock reading of the first rotation
    pub start: DateTime<Utc>,
}

/// State after one simulated rotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationRound {
    pub round: usize,
    pub tag: String,
    pub class_label: char,
    pub control_number: ControlNumber,
    /// Rounds whose snapshot was destroyed by this rotation
    pub destroyed_rounds: Vec<usize>,
    /// Labels of the live snapshots, newest first
    pub live: String,
    /// Rounds covered by the oldest live snapshot, this one included
    pub horizon: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub class_count: usize,
    pub rounds: Vec<SimulationRound>,
}

impl SimulationReport {
    /// Label sequence across all rounds
    pub fn schedule(&self) -> String {
        self.rounds.iter().map(|r| r.class_label).collect()
    }

    pub fn max_live(&self) -> usize {
        self.rounds
            .iter()
            .map(|r| r.live.chars().count())
            .max()
            .unwrap_or(0)
    }
}

/// Simulate `options.rounds` rotations with `config`
///
/// # Errors
///
/// Configuration errors, or `InvalidConfig` for a non-positive interval or
/// one that carries the run past the last representable date.
pub fn simulate(config: &RotationConfig, options: &SimulationOptions) -> Result<SimulationReport> {
    log_op_start!(
        "simulate",
        rounds = options.rounds,
        class_count = config.class_count
    );
    let start = Instant::now();

    let report = simulate_impl(config, options).map_err(|e| {
        log_op_error!(
            "simulate",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "simulate",
        duration_ms = start.elapsed().as_millis() as u64,
        rounds = report.rounds.len(),
        max_live = report.max_live()
    );

    Ok(report)
}

fn simulate_impl(config: &RotationConfig, options: &SimulationOptions) -> Result<SimulationReport> {
    let table = config.validate()?;
    if options.interval_secs <= 0 {
        return Err(HanoiError::InvalidConfig {
            reason: format!(
                "simulation interval must be positive, got {}",
                options.interval_secs
            ),
        });
    }

    // one interval past the last rotation must still be a valid date
    round_clock(options, options.rounds.saturating_add(1))?;

    let mut store = MemoryStore::with_datasets([SIMULATION_DATASET]);
    let mut born: HashMap<SnapshotId, usize> = HashMap::new();
    let mut rounds = Vec::with_capacity(options.rounds);

    for round in 1..=options.rounds {
        let now = round_clock(options, round)?;
        store.advance_clock(options.interval_secs)?;

        let report = rotate_dataset(
            &mut store,
            SIMULATION_DATASET,
            config,
            &RotationOptions::default(),
            now,
        )?;
        let outcome = match report.datasets.into_iter().next() {
            Some(DatasetRotation::Rotated(outcome)) => outcome,
            _ => {
                return Err(HanoiError::InvalidConfig {
                    reason: "simulated rotation produced no outcome".to_string(),
                })
            }
        };
        born.insert(outcome.snapshot.clone(), round);

        let state = load_state(&store, SIMULATION_DATASET, config)?;
        let live = state
            .entries()
            .iter()
            .map(|e| e.class_label.map_or('?', |l| l.as_char()))
            .collect();
        let oldest = state
            .entries()
            .iter()
            .filter_map(|e| born.get(&e.id))
            .min()
            .copied()
            .unwrap_or(round);

        rounds.push(SimulationRound {
            round,
            tag: report.tag,
            class_label: outcome.class.label.as_char(),
            control_number: outcome.control_number,
            destroyed_rounds: outcome
                .destroyed
                .iter()
                .filter_map(|id| born.get(id).copied())
                .collect(),
            live,
            horizon: round - oldest + 1,
        });
    }

    Ok(SimulationReport {
        class_count: table.len(),
        rounds,
    })
}

/// Clock reading of `round` (1-based), or `InvalidConfig` when it leaves
/// the representable range
fn round_clock(options: &SimulationOptions, round: usize) -> Result<DateTime<Utc>> {
    let out_of_range = || HanoiError::InvalidConfig {
        reason: format!(
            "simulation interval of {}s over {} rounds is out of range",
            options.interval_secs, options.rounds
        ),
    };
    let elapsed = i64::try_from(round - 1)
        .ok()
        .and_then(|steps| options.interval_secs.checked_mul(steps))
        .and_then(TimeDelta::try_seconds)
        .ok_or_else(out_of_range)?;
    options
        .start
        .checked_add_signed(elapsed)
        .ok_or_else(out_of_range)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(rounds: usize) -> SimulationOptions {
        SimulationOptions {
            rounds,
            interval_secs: 3600,
            start: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        }
    }

    #[test]
    fn test_four_class_schedule() {
        let report = simulate(&RotationConfig::new(4), &options(17)).unwrap();

        assert_eq!(report.schedule(), "DABACABADABACABAD");
        assert_eq!(report.max_live(), 4);
    }

    #[test]
    fn test_rounds_record_destroyed_generations() {
        let report = simulate(&RotationConfig::new(3), &options(4)).unwrap();

        // C, A, B, A: the fourth rotation supersedes the second
        assert_eq!(report.rounds[3].class_label, 'A');
        assert_eq!(report.rounds[3].destroyed_rounds, vec![2]);
        assert_eq!(report.rounds[3].live, "ABC");
        assert_eq!(report.rounds[3].horizon, 4);
    }

    #[test]
    fn test_non_positive_interval_is_rejected() {
        let mut opts = options(3);
        opts.interval_secs = 0;

        let err = simulate(&RotationConfig::default(), &opts).unwrap_err();

        assert!(err.is_config_error());
    }

    #[test]
    fn test_interval_beyond_clock_range_is_rejected() {
        let mut opts = options(3);
        opts.interval_secs = 24 * 3600 * 400_000_000_000;

        let err = simulate(&RotationConfig::default(), &opts).unwrap_err();

        assert!(err.is_config_error(), "got {:?}", err);
    }

    #[test]
    fn test_late_round_past_max_date_is_rejected() {
        // representable as a delta, but round 2 lands past the last date
        let mut opts = options(3);
        opts.interval_secs = 100_000_000_000_000;

        let err = simulate(&RotationConfig::default(), &opts).unwrap_err();

        assert!(matches!(err, HanoiError::InvalidConfig { .. }));
    }
}
