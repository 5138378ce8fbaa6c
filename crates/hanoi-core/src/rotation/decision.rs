//! Rotation decision engine
//!
//! Scans the classes from position 0 to the last one. The first position
//! whose history entry does not wear the expected label is the rotation
//! point; the last class is always a rotation point when reached. Exactly
//! one class is rotated per invocation.
//!
//! Class `k` is reused every `2^(k+1)` rotations, the last class shares the
//! `2^(N-1)` period of the one before it, so `N` classes keep `N` snapshots
//! covering `2^(N-2)+1 ..= 2^(N-1)` rotations.
//!
//! The very first two rotations of a dataset can overwrite the newest
//! backup early. That is inherent to the scheme; starting an empty history
//! at the last class is the only mitigation applied.

use serde::{Deserialize, Serialize};

use crate::config::RotationConfig;
use crate::errors::{ExError, Result};
use crate::model::{ControlNumber, Properties, RetentionClass, SnapshotId};
use crate::rotation::class_table::ClassTable;
use crate::rotation::projector::RotationState;
use crate::store::SnapshotStore;

/// How the new generation comes into existence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotationAction {
    /// Take a new non-recursive snapshot already carrying its class
    CreateAndTag { snapshot: SnapshotId },
    /// Classify a snapshot that was taken earlier (recursive runs)
    RetagExisting { snapshot: SnapshotId },
}

impl RotationAction {
    pub fn snapshot(&self) -> &SnapshotId {
        match self {
            RotationAction::CreateAndTag { snapshot } => snapshot,
            RotationAction::RetagExisting { snapshot } => snapshot,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RotationAction::CreateAndTag { .. } => "create_and_tag",
            RotationAction::RetagExisting { .. } => "retag_existing",
        }
    }
}

/// Pure outcome of the scan: what would be rotated and what it supersedes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationDecision {
    /// History position where the scan stopped
    pub rotation_point: usize,
    /// Class the new generation receives
    pub class: RetentionClass,
    /// Every existing snapshot wearing that class
    pub obsolete: Vec<SnapshotId>,
    /// True when the history was empty
    pub bootstrap: bool,
}

/// One obsolete snapshot that could not be destroyed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestroyFailure {
    pub snapshot: SnapshotId,
    pub code: String,
    pub message: String,
}

/// Result of rotating one dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationOutcome {
    pub dataset: String,
    pub snapshot: SnapshotId,
    pub class: RetentionClass,
    pub control_number: ControlNumber,
    pub rotation_point: usize,
    pub destroyed: Vec<SnapshotId>,
    pub destroy_failures: Vec<DestroyFailure>,
}

impl RotationOutcome {
    /// New generation tagged and every obsolete snapshot gone
    pub fn is_clean(&self) -> bool {
        self.destroy_failures.is_empty()
    }
}

/// Choose the rotation point and the obsolete set
pub fn decide(state: &RotationState, table: &ClassTable) -> RotationDecision {
    let last = table.len() - 1;

    let rotation_point = (0..table.len())
        .find(|&ptr| {
            let has_correct_occupant = match (state.get(ptr), table.label(ptr)) {
                (Some(entry), Some(expected)) => entry.wears(expected),
                _ => false,
            };
            ptr == last || !has_correct_occupant
        })
        .unwrap_or(last);

    let bootstrap = state.is_empty();
    let class = if bootstrap {
        table.most_junior()
    } else {
        table.get(rotation_point).unwrap_or_else(|| table.most_junior())
    };

    let obsolete = state
        .occupants(class.label)
        .map(|entry| entry.id.clone())
        .collect();

    RotationDecision {
        rotation_point,
        class,
        obsolete,
        bootstrap,
    }
}

/// Decide, tag the new generation, then destroy the obsolete set
///
/// # Errors
///
/// A failed tag (snapshot creation or property update) is returned and no
/// snapshot is destroyed. Destroy failures are not errors: they are
/// recorded per snapshot in the outcome and the remaining destroys still run.
pub fn rotate<S: SnapshotStore + ?Sized>(
    store: &mut S,
    state: &RotationState,
    table: &ClassTable,
    control_number: ControlNumber,
    action: &RotationAction,
    config: &RotationConfig,
) -> Result<RotationOutcome> {
    let decision = decide(state, table);
    let label = decision.class.label.to_string();
    let control = control_number.to_string();

    tracing::debug!(
        dataset = state.dataset(),
        snapshot = %action.snapshot(),
        action = action.name(),
        rotation_point = decision.rotation_point,
        class_label = %label,
        control_number = %control,
        obsolete = decision.obsolete.len(),
        "rotation point chosen"
    );

    match action {
        RotationAction::CreateAndTag { snapshot } => {
            let mut props = Properties::new();
            props.insert(config.class_property.clone(), label);
            props.insert(config.control_property.clone(), control);
            store.take_snapshot(snapshot.dataset(), snapshot.tag(), false, &props)?;
        }
        RotationAction::RetagExisting { snapshot } => {
            store.set_property(snapshot, &config.control_property, &control)?;
            store.set_property(snapshot, &config.class_property, &label)?;
        }
    }

    let mut destroyed = Vec::new();
    let mut destroy_failures = Vec::new();
    for old in decision
        .obsolete
        .into_iter()
        .filter(|old| old != action.snapshot())
    {
        match store.destroy_snapshot(&old) {
            Ok(()) => {
                tracing::debug!(snapshot = %old, "destroyed obsolete snapshot");
                destroyed.push(old);
            }
            Err(e) => {
                tracing::warn!(snapshot = %old, error = %e, "failed to destroy obsolete snapshot");
                let ex: ExError = e.into();
                destroy_failures.push(DestroyFailure {
                    snapshot: old,
                    code: ex.code().to_string(),
                    message: ex.message().to_string(),
                });
            }
        }
    }

    Ok(RotationOutcome {
        dataset: state.dataset().to_string(),
        snapshot: action.snapshot().clone(),
        class: decision.class,
        control_number,
        rotation_point: decision.rotation_point,
        destroyed,
        destroy_failures,
    })
}
