//! Tower-of-Hanoi rotation core
//!
//! - [`class_table`]: retention classes for a class count
//! - [`sequencer`]: next diagnostic control number
//! - [`projector`]: newest-first view of a dataset's scheme snapshots
//! - [`decision`]: rotation point, obsolete set, tag-then-destroy

pub mod class_table;
pub mod decision;
pub mod projector;
pub mod sequencer;

pub use class_table::{classes, ClassTable};
pub use decision::{
    decide, rotate, DestroyFailure, RotationAction, RotationDecision, RotationOutcome,
};
pub use projector::{load_state, project, RotationState};
pub use sequencer::next_control_number;
