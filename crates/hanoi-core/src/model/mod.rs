pub mod class;
pub mod snapshot;

pub use class::{ClassLabel, ControlNumber, RetentionClass};
pub use snapshot::{ClassifiedSnapshot, Properties, SnapshotId};
