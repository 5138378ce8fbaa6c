//! Rotation orchestration
//!
//! ## Single dataset
//! 1. Validate configuration (no store call on failure)
//! 2. Generate `<prefix>-<YYYYmmddHHMMSS>` from the injected clock
//! 3. List, project, sequence
//! 4. Take a new snapshot already carrying its class, then destroy the
//!    superseded generation
//!
//! ## Hierarchy
//! 1. Validate configuration, generate one tag
//! 2. Take one recursive snapshot carrying placeholder properties
//! 3. For the root and every descendant: list, project, drop the snapshot
//!    just taken, sequence, retag it, destroy the superseded generation
//!
//! A dataset that fails in step 3 is recorded as failed and the remaining
//! datasets are still processed. Nothing is retried.
//!
//! `dry_run` stops both variants before their first write and reports plans.

use std::time::Instant;

use chrono::{DateTime, Utc};
use hanoi_core::config::RotationConfig;
use hanoi_core::errors::{ExError, Result};
use hanoi_core::model::{Properties, SnapshotId};
use hanoi_core::rotation::{load_state, next_control_number, rotate, ClassTable, RotationAction};
use hanoi_core::store::SnapshotStore;
use hanoi_core::{log_op_end, log_op_error, log_op_start};
use hanoi_core_types::RunContext;

use crate::commands::plan::{plan_with_tag, RotationPlan};
use crate::report::{DatasetRotation, RotationReport};

/// Class property value carried by a recursive snapshot until it is classified
pub const PLACEHOLDER_CLASS: &str = "unknown";
/// Control property value carried by a recursive snapshot until it is classified
pub const PLACEHOLDER_CONTROL: &str = "X";

const TAG_TIME_FORMAT: &str = "%Y%m%d%H%M%S";

/// Options for one orchestrator run
#[derive(Debug, Clone, Default)]
pub struct RotationOptions {
    /// Plan only; the store is read but never written
    pub dry_run: bool,
    pub context: RunContext,
}

impl RotationOptions {
    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Self::default()
        }
    }

    pub fn with_context(mut self, context: RunContext) -> Self {
        self.context = context;
        self
    }
}

/// Snapshot tag for a run started at `now` (UTC, second resolution)
pub fn generate_tag(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{}-{}", prefix, now.format(TAG_TIME_FORMAT))
}

/// Rotate one dataset
///
/// # Errors
///
/// - `InvalidClassCount` / `InvalidConfig`: raised before any store call
/// - `NotFound`: the dataset does not exist
/// - `StoreFailure`: listing or tagging failed; nothing was destroyed
///
/// Failed destroys are not errors; they are listed in the outcome.
pub fn rotate_dataset<S: SnapshotStore + ?Sized>(
    store: &mut S,
    dataset: &str,
    config: &RotationConfig,
    options: &RotationOptions,
    now: DateTime<Utc>,
) -> Result<RotationReport> {
    let run_id = options.context.run_id.clone();
    log_op_start!(
        "rotate_dataset",
        run_id = run_id.as_str(),
        dataset = dataset,
        dry_run = options.dry_run
    );
    let start = Instant::now();

    let tag = generate_tag(&config.prefix, now);
    let rotation = rotate_dataset_impl(store, dataset, &tag, config, options).map_err(|e| {
        log_op_error!(
            "rotate_dataset",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            run_id = run_id.as_str(),
            dataset = dataset
        );
        e
    })?;

    let class_label = rotation.class().map(|c| c.label.to_string()).unwrap_or_default();
    log_op_end!(
        "rotate_dataset",
        duration_ms = start.elapsed().as_millis() as u64,
        run_id = run_id.as_str(),
        dataset = dataset,
        tag = tag.as_str(),
        class_label = class_label.as_str(),
        destroyed = rotation.destroyed_count()
    );

    Ok(RotationReport {
        run_id,
        root: dataset.to_string(),
        tag,
        recursive: false,
        dry_run: options.dry_run,
        datasets: vec![rotation],
    })
}

fn rotate_dataset_impl<S: SnapshotStore + ?Sized>(
    store: &mut S,
    dataset: &str,
    tag: &str,
    config: &RotationConfig,
    options: &RotationOptions,
) -> Result<DatasetRotation> {
    if options.dry_run {
        return Ok(DatasetRotation::Planned(plan_with_tag(
            &*store, dataset, tag, config,
        )?));
    }

    let table = config.validate()?;
    let snapshot = SnapshotId::new(dataset, tag)?;
    let state = load_state(&*store, dataset, config)?;
    let control = next_control_number(state.entries(), table.control_modulus());
    let action = RotationAction::CreateAndTag { snapshot };

    let outcome = rotate(store, &state, &table, control, &action, config)?;
    Ok(DatasetRotation::Rotated(outcome))
}

/// Rotate `root` and every descendant from one atomic recursive snapshot
///
/// # Errors
///
/// - `InvalidClassCount` / `InvalidConfig`: raised before any store call
/// - `StoreFailure` / `NotFound`: the recursive snapshot or the dataset
///   listing failed
///
/// Per-dataset failures after the recursive snapshot are reported as
/// [`DatasetRotation::Failed`] entries, not as errors.
pub fn rotate_hierarchy<S: SnapshotStore + ?Sized>(
    store: &mut S,
    root: &str,
    config: &RotationConfig,
    options: &RotationOptions,
    now: DateTime<Utc>,
) -> Result<RotationReport> {
    let run_id = options.context.run_id.clone();
    log_op_start!(
        "rotate_hierarchy",
        run_id = run_id.as_str(),
        dataset = root,
        dry_run = options.dry_run
    );
    let start = Instant::now();

    let report = rotate_hierarchy_impl(store, root, config, options, now).map_err(|e| {
        log_op_error!(
            "rotate_hierarchy",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            run_id = run_id.as_str(),
            dataset = root
        );
        e
    })?;

    log_op_end!(
        "rotate_hierarchy",
        duration_ms = start.elapsed().as_millis() as u64,
        run_id = run_id.as_str(),
        dataset = root,
        tag = report.tag.as_str(),
        datasets = report.datasets.len(),
        failed = report.failed_count()
    );

    Ok(report)
}

fn rotate_hierarchy_impl<S: SnapshotStore + ?Sized>(
    store: &mut S,
    root: &str,
    config: &RotationConfig,
    options: &RotationOptions,
    now: DateTime<Utc>,
) -> Result<RotationReport> {
    let table = config.validate()?;
    let tag = generate_tag(&config.prefix, now);
    let root_snapshot = SnapshotId::new(root, tag.as_str())?;

    if !options.dry_run {
        let mut placeholder = Properties::new();
        placeholder.insert(config.class_property.clone(), PLACEHOLDER_CLASS.to_string());
        placeholder.insert(config.control_property.clone(), PLACEHOLDER_CONTROL.to_string());
        store.take_snapshot(root, &tag, true, &placeholder)?;
        tracing::debug!(snapshot = %root_snapshot, "recursive snapshot taken");
    }

    let datasets = store.list_datasets(root)?;
    let run_id = options.context.run_id.as_str();
    let mut entries = Vec::with_capacity(datasets.len());

    for dataset in datasets {
        let start = Instant::now();
        let entry = match retag_dataset(store, &dataset, &tag, &table, config, options) {
            Ok(entry) => {
                let class_label = entry.class().map(|c| c.label.to_string()).unwrap_or_default();
                log_op_end!(
                    "retag_dataset",
                    duration_ms = start.elapsed().as_millis() as u64,
                    run_id = run_id,
                    dataset = dataset.as_str(),
                    class_label = class_label.as_str(),
                    destroyed = entry.destroyed_count()
                );
                entry
            }
            Err(e) => {
                let ex: ExError = e.clone().into();
                log_op_error!(
                    "retag_dataset",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    run_id = run_id,
                    dataset = dataset.as_str()
                );
                DatasetRotation::Failed {
                    dataset,
                    code: ex.code().to_string(),
                    error: e.to_string(),
                }
            }
        };
        entries.push(entry);
    }

    Ok(RotationReport {
        run_id: options.context.run_id.clone(),
        root: root.to_string(),
        tag,
        recursive: true,
        dry_run: options.dry_run,
        datasets: entries,
    })
}

/// Classify this dataset's member of the recursive snapshot
fn retag_dataset<S: SnapshotStore + ?Sized>(
    store: &mut S,
    dataset: &str,
    tag: &str,
    table: &ClassTable,
    config: &RotationConfig,
    options: &RotationOptions,
) -> Result<DatasetRotation> {
    let snapshot = SnapshotId::new(dataset, tag)?;
    let state = load_state(&*store, dataset, config)?.without(&snapshot);

    if options.dry_run {
        return Ok(DatasetRotation::Planned(RotationPlan::from_state(
            &state, table, snapshot,
        )));
    }

    let control = next_control_number(state.entries(), table.control_modulus());
    let action = RotationAction::RetagExisting { snapshot };
    let outcome = rotate(store, &state, table, control, &action, config)?;
    Ok(DatasetRotation::Rotated(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_generate_tag_format() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();

        assert_eq!(generate_tag("hanoi", now), "hanoi-20240309070501");
        assert_eq!(generate_tag("tower", now), "tower-20240309070501");
    }

    #[test]
    fn test_dry_run_options() {
        let options = RotationOptions::dry_run();

        assert!(options.dry_run);
        assert!(!RotationOptions::default().dry_run);
    }
}
