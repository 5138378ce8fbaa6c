//! Dataset status: the projected rotation history

use std::time::Instant;

use hanoi_core::config::RotationConfig;
use hanoi_core::errors::Result;
use hanoi_core::model::{ClassifiedSnapshot, RetentionClass};
use hanoi_core::rotation::{decide, load_state};
use hanoi_core::store::SnapshotStore;
use hanoi_core::{log_op_end, log_op_error, log_op_start};
use serde::{Deserialize, Serialize};

/// Current rotation history of one dataset, newest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetStatus {
    pub dataset: String,
    pub class_count: usize,
    pub history: Vec<ClassifiedSnapshot>,
    /// Entries with no readable class
    pub unclassified: usize,
    /// Class the next rotation will replace
    pub next_class: RetentionClass,
}

impl DatasetStatus {
    /// Labels present in the history, newest first; `?` for unclassified
    pub fn label_line(&self) -> String {
        self.history
            .iter()
            .map(|e| e.class_label.map_or('?', |l| l.as_char()))
            .collect()
    }
}

/// Project the history of `dataset`
///
/// # Errors
///
/// Configuration errors before any store call, then listing failures.
pub fn status<S: SnapshotStore + ?Sized>(
    store: &S,
    dataset: &str,
    config: &RotationConfig,
) -> Result<DatasetStatus> {
    log_op_start!("status", dataset = dataset);
    let start = Instant::now();

    let result = status_impl(store, dataset, config).map_err(|e| {
        log_op_error!(
            "status",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            dataset = dataset
        );
        e
    })?;

    log_op_end!(
        "status",
        duration_ms = start.elapsed().as_millis() as u64,
        dataset = dataset,
        history_len = result.history.len()
    );

    Ok(result)
}

fn status_impl<S: SnapshotStore + ?Sized>(
    store: &S,
    dataset: &str,
    config: &RotationConfig,
) -> Result<DatasetStatus> {
    let table = config.validate()?;
    let state = load_state(store, dataset, config)?;
    let next_class = decide(&state, &table).class;
    let history = state.entries().to_vec();
    let unclassified = history.iter().filter(|e| e.class_label.is_none()).count();

    Ok(DatasetStatus {
        dataset: dataset.to_string(),
        class_count: table.len(),
        history,
        unclassified,
        next_class,
    })
}
