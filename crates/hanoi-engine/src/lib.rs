//! Hanoi Engine - Rotation orchestration layer
//!
//! Coordinates the rotation core with a snapshot store: one dataset at a
//! time, or a whole hierarchy snapshotted atomically and then classified
//! dataset by dataset.

pub mod commands;
pub mod report;

pub use commands::plan::{plan_dataset, RotationPlan};
pub use commands::rotate::{generate_tag, rotate_dataset, rotate_hierarchy, RotationOptions};
pub use commands::simulate::{simulate, SimulationOptions, SimulationReport, SimulationRound};
pub use commands::status::{status, DatasetStatus};
pub use report::{DatasetRotation, RotationReport};
