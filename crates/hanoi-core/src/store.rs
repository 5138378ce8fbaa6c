//! Snapshot store contract
//!
//! The rotation core only talks to storage through this trait. Every
//! primitive is blocking and reports failure as a single `HanoiError`:
//! `NotFound` when the target does not exist, `StoreFailure` for anything
//! else. Transport-level detail is carried as an opaque message.

use crate::errors::Result;
use crate::model::{Properties, SnapshotId};

/// Storage backend holding datasets and their snapshots
///
/// # Ordering contract
///
/// `list_snapshots` and `list_datasets` must enumerate in a stable order:
/// two calls against an unchanged store return the same sequence. The
/// projector relies on it to break creation-time ties deterministically.
pub trait SnapshotStore {
    /// Snapshots of `dataset` itself, not of its descendants; empty when none
    fn list_snapshots(&self, dataset: &str) -> Result<Vec<SnapshotId>>;

    /// `root` followed by every descendant dataset, parents before children
    fn list_datasets(&self, root: &str) -> Result<Vec<String>>;

    /// Requested properties of one snapshot; unknown names are omitted
    fn get_properties(&self, snapshot: &SnapshotId, names: &[&str]) -> Result<Properties>;

    fn set_property(&mut self, snapshot: &SnapshotId, name: &str, value: &str) -> Result<()>;

    /// Take `dataset@tag` carrying `properties`
    ///
    /// With `recursive` every descendant gets a snapshot with the same tag
    /// at the same instant.
    fn take_snapshot(
        &mut self,
        dataset: &str,
        tag: &str,
        recursive: bool,
        properties: &Properties,
    ) -> Result<()>;

    fn destroy_snapshot(&mut self, snapshot: &SnapshotId) -> Result<()>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for &mut S {
    fn list_snapshots(&self, dataset: &str) -> Result<Vec<SnapshotId>> {
        (**self).list_snapshots(dataset)
    }

    fn list_datasets(&self, root: &str) -> Result<Vec<String>> {
        (**self).list_datasets(root)
    }

    fn get_properties(&self, snapshot: &SnapshotId, names: &[&str]) -> Result<Properties> {
        (**self).get_properties(snapshot, names)
    }

    fn set_property(&mut self, snapshot: &SnapshotId, name: &str, value: &str) -> Result<()> {
        (**self).set_property(snapshot, name, value)
    }

    fn take_snapshot(
        &mut self,
        dataset: &str,
        tag: &str,
        recursive: bool,
        properties: &Properties,
    ) -> Result<()> {
        (**self).take_snapshot(dataset, tag, recursive, properties)
    }

    fn destroy_snapshot(&mut self, snapshot: &SnapshotId) -> Result<()> {
        (**self).destroy_snapshot(snapshot)
    }
}
