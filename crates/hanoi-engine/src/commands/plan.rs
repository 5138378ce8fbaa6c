//! Dry-run planning
//!
//! Same read path as a real rotation (validate, list, project, sequence,
//! decide) with no write to the store.

use std::time::Instant;

use chrono::{DateTime, Utc};
use hanoi_core::config::RotationConfig;
use hanoi_core::errors::Result;
use hanoi_core::model::{ControlNumber, RetentionClass, SnapshotId};
use hanoi_core::rotation::{decide, load_state, next_control_number, ClassTable, RotationState};
use hanoi_core::store::SnapshotStore;
use hanoi_core::{log_op_end, log_op_error, log_op_start};
use serde::{Deserialize, Serialize};

use crate::commands::rotate::generate_tag;

/// What one rotation of a dataset would do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationPlan {
    pub dataset: String,
    /// Snapshot that would carry the new generation
    pub snapshot: SnapshotId,
    pub rotation_point: usize,
    pub class: RetentionClass,
    pub control_number: ControlNumber,
    /// Snapshots that would be destroyed after tagging
    pub obsolete: Vec<SnapshotId>,
    pub bootstrap: bool,
    pub history_len: usize,
}

impl RotationPlan {
    /// Plan the next rotation of `state` into `snapshot`
    pub fn from_state(state: &RotationState, table: &ClassTable, snapshot: SnapshotId) -> Self {
        let decision = decide(state, table);
        let control_number = next_control_number(state.entries(), table.control_modulus());
        let obsolete = decision
            .obsolete
            .into_iter()
            .filter(|old| old != &snapshot)
            .collect();

        Self {
            dataset: state.dataset().to_string(),
            snapshot,
            rotation_point: decision.rotation_point,
            class: decision.class,
            control_number,
            obsolete,
            bootstrap: decision.bootstrap,
            history_len: state.len(),
        }
    }
}

/// Plan the next single-dataset rotation at `now`
///
/// # Errors
///
/// Configuration errors before any store call, then listing failures.
pub fn plan_dataset<S: SnapshotStore + ?Sized>(
    store: &S,
    dataset: &str,
    config: &RotationConfig,
    now: DateTime<Utc>,
) -> Result<RotationPlan> {
    log_op_start!("plan_dataset", dataset = dataset);
    let start = Instant::now();

    let tag = generate_tag(&config.prefix, now);
    let plan = plan_with_tag(store, dataset, &tag, config).map_err(|e| {
        log_op_error!(
            "plan_dataset",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            dataset = dataset
        );
        e
    })?;

    let class_label = plan.class.label.to_string();
    log_op_end!(
        "plan_dataset",
        duration_ms = start.elapsed().as_millis() as u64,
        dataset = dataset,
        class_label = class_label.as_str(),
        obsolete = plan.obsolete.len()
    );

    Ok(plan)
}

pub(crate) fn plan_with_tag<S: SnapshotStore + ?Sized>(
    store: &S,
    dataset: &str,
    tag: &str,
    config: &RotationConfig,
) -> Result<RotationPlan> {
    let table = config.validate()?;
    let snapshot = SnapshotId::new(dataset, tag)?;
    let state = load_state(store, dataset, config)?;
    Ok(RotationPlan::from_state(&state, &table, snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hanoi_core::model::Properties;
    use hanoi_store::MemoryStore;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn tagged(class: &str, control: &str) -> Properties {
        let mut props = Properties::new();
        props.insert("backup:class".to_string(), class.to_string());
        props.insert("backup:cycle_nr".to_string(), control.to_string());
        props
    }

    #[test]
    fn test_plan_on_empty_dataset_bootstraps() {
        let store = MemoryStore::with_datasets(["tank"]);

        let plan = plan_dataset(&store, "tank", &RotationConfig::default(), at(0)).unwrap();

        assert!(plan.bootstrap);
        assert_eq!(plan.class.label.as_char(), 'E');
        assert_eq!(plan.control_number, ControlNumber::ZERO);
        assert_eq!(plan.snapshot.to_string(), "tank@hanoi-19700101000000");
        assert!(plan.obsolete.is_empty());
    }

    #[test]
    fn test_plan_leaves_store_untouched() {
        let mut store = MemoryStore::with_datasets(["tank"]);
        store.seed_snapshot("tank", "hanoi-1", tagged("A", "3")).unwrap();
        store.seed_snapshot("tank", "hanoi-2", tagged("C", "4")).unwrap();
        let before = store.list_snapshots("tank").unwrap();

        let plan = plan_dataset(&store, "tank", &RotationConfig::new(3), at(60)).unwrap();

        assert_eq!(plan.class.label.as_char(), 'A');
        assert_eq!(plan.control_number, ControlNumber::new(1));
        assert_eq!(plan.obsolete, vec!["tank@hanoi-1".parse::<SnapshotId>().unwrap()]);
        assert_eq!(store.list_snapshots("tank").unwrap(), before);
    }

    #[test]
    fn test_invalid_config_fails_before_listing() {
        let store = MemoryStore::new();

        let err = plan_dataset(&store, "missing", &RotationConfig::new(0), at(0)).unwrap_err();

        assert!(err.is_config_error());
    }
}
