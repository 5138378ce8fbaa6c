//! Hanoi Core - Tower-of-Hanoi snapshot rotation kernel
//!
//! This crate provides the pieces of a rotation run that do not depend on a
//! particular storage backend:
//! - Data model for snapshots, retention classes and control numbers
//! - The [`SnapshotStore`] contract every backend implements
//! - Class table, control-number sequencer, history projector
//! - The rotation decision engine (tag new generation, destroy superseded)
//! - Error and structured logging facilities shared by all crates

pub mod config;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod rotation;
pub mod store;

pub use hanoi_core_types as core_types;

// Re-export commonly used types
pub use config::RotationConfig;
pub use errors::{ExError, ExErrorKind, HanoiError, Result};
pub use model::{ClassLabel, ClassifiedSnapshot, ControlNumber, Properties, RetentionClass, SnapshotId};
pub use rotation::{
    ClassTable, RotationAction, RotationDecision, RotationOutcome, RotationState,
};
pub use store::SnapshotStore;
