//! In-memory snapshot store
//!
//! Keeps a dataset tree and its snapshots in process memory. Creation times
//! come from a monotonic counter, so every snapshot is strictly newer than
//! the previous one except the members of one recursive snapshot, which
//! share an instant. Faults can be injected per target to exercise failure
//! paths without a real pool.

use std::collections::BTreeSet;

use hanoi_core::model::{Properties, SnapshotId};
use hanoi_core::store::SnapshotStore;

use crate::errors::{injected_fault, HanoiError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
struct StoredSnapshot {
    id: SnapshotId,
    creation: i64,
    properties: Properties,
}

#[derive(Debug, Clone, Default)]
struct Faults {
    tag: BTreeSet<String>,
    destroy: BTreeSet<String>,
    get: BTreeSet<String>,
}

impl Faults {
    /// A target matches a snapshot by full name or by its dataset
    fn hits(set: &BTreeSet<String>, snapshot: &SnapshotId) -> bool {
        set.contains(snapshot.dataset()) || set.contains(&snapshot.to_string())
    }
}

/// Snapshot store held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    datasets: BTreeSet<String>,
    snapshots: Vec<StoredSnapshot>,
    clock: i64,
    faults: Faults,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding `datasets` (and their missing parents)
    pub fn with_datasets<I, S>(datasets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut store = Self::new();
        for dataset in datasets {
            store.create_dataset(dataset.as_ref());
        }
        store
    }

    /// Create `dataset` and every missing parent
    pub fn create_dataset(&mut self, dataset: &str) {
        let mut path = String::new();
        for part in dataset.split('/').filter(|p| !p.is_empty()) {
            if !path.is_empty() {
                path.push('/');
            }
            path.push_str(part);
            self.datasets.insert(path.clone());
        }
    }

    pub fn has_dataset(&self, dataset: &str) -> bool {
        self.datasets.contains(dataset)
    }

    /// Creation time of the most recent snapshot
    pub fn now(&self) -> i64 {
        self.clock
    }

    /// Move the creation clock forward
    ///
    /// # Errors
    ///
    /// `StoreFailure` when the clock would overflow.
    pub fn advance_clock(&mut self, seconds: i64) -> Result<()> {
        self.clock = self.tick("advance_clock", "clock", seconds.max(0))?;
        Ok(())
    }

    fn tick(&self, op: &str, target: &str, seconds: i64) -> Result<i64> {
        self.clock
            .checked_add(seconds)
            .ok_or_else(|| HanoiError::store_failure(op, target, "creation clock overflow"))
    }

    /// Place a pre-existing snapshot with arbitrary properties
    ///
    /// # Errors
    ///
    /// Same as a non-recursive `take_snapshot`, minus fault injection.
    pub fn seed_snapshot(&mut self, dataset: &str, tag: &str, properties: Properties) -> Result<()> {
        let id = SnapshotId::new(dataset, tag)?;
        self.ensure_dataset(dataset)?;
        self.ensure_absent(&id)?;
        let creation = self.tick("seed_snapshot", &id.to_string(), 1)?;
        self.clock = creation;
        self.snapshots.push(StoredSnapshot {
            id,
            creation,
            properties,
        });
        Ok(())
    }

    pub fn contains(&self, snapshot: &SnapshotId) -> bool {
        self.position(snapshot).is_some()
    }

    /// Snapshots of exactly `dataset`, oldest first
    pub fn snapshots_of(&self, dataset: &str) -> Vec<SnapshotId> {
        self.snapshots
            .iter()
            .filter(|s| s.id.dataset() == dataset)
            .map(|s| s.id.clone())
            .collect()
    }

    /// User properties stored on one snapshot
    pub fn properties(&self, snapshot: &SnapshotId) -> Option<&Properties> {
        self.position(snapshot).map(|i| &self.snapshots[i].properties)
    }

    pub fn snapshot_count(&self) -> usize {
        self.snapshots.len()
    }

    /// Fail snapshot creation and property updates on `target`
    pub fn fail_tag(&mut self, target: impl Into<String>) {
        self.faults.tag.insert(target.into());
    }

    /// Fail destruction of `target`
    pub fn fail_destroy(&mut self, target: impl Into<String>) {
        self.faults.destroy.insert(target.into());
    }

    /// Fail property reads on `target`
    pub fn fail_get(&mut self, target: impl Into<String>) {
        self.faults.get.insert(target.into());
    }

    pub fn clear_faults(&mut self) {
        self.faults = Faults::default();
    }

    fn position(&self, snapshot: &SnapshotId) -> Option<usize> {
        self.snapshots.iter().position(|s| &s.id == snapshot)
    }

    fn ensure_dataset(&self, dataset: &str) -> Result<()> {
        if self.has_dataset(dataset) {
            Ok(())
        } else {
            Err(HanoiError::not_found(dataset))
        }
    }

    fn ensure_absent(&self, snapshot: &SnapshotId) -> Result<()> {
        if self.contains(snapshot) {
            return Err(HanoiError::store_failure(
                "take_snapshot",
                snapshot.to_string(),
                "dataset already exists",
            ));
        }
        Ok(())
    }

    fn locate(&self, snapshot: &SnapshotId) -> Result<usize> {
        self.position(snapshot)
            .ok_or_else(|| HanoiError::not_found(snapshot.to_string()))
    }

    fn subtree<'a>(&'a self, root: &'a str) -> impl Iterator<Item = &'a String> + 'a {
        self.datasets.iter().filter(move |d| is_within(d, root))
    }
}

fn is_within(dataset: &str, root: &str) -> bool {
    dataset == root
        || dataset
            .strip_prefix(root)
            .is_some_and(|rest| rest.starts_with('/'))
}

impl SnapshotStore for MemoryStore {
    fn list_snapshots(&self, dataset: &str) -> Result<Vec<SnapshotId>> {
        self.ensure_dataset(dataset)?;
        Ok(self
            .snapshots
            .iter()
            .filter(|s| s.id.dataset() == dataset)
            .map(|s| s.id.clone())
            .collect())
    }

    fn list_datasets(&self, root: &str) -> Result<Vec<String>> {
        self.ensure_dataset(root)?;
        Ok(self.subtree(root).cloned().collect())
    }

    fn get_properties(&self, snapshot: &SnapshotId, names: &[&str]) -> Result<Properties> {
        let index = self.locate(snapshot)?;
        if Faults::hits(&self.faults.get, snapshot) {
            return Err(injected_fault("get_properties", &snapshot.to_string()));
        }

        let stored = &self.snapshots[index];
        let mut props = Properties::new();
        for name in names {
            let value = match *name {
                "name" => Some(stored.id.to_string()),
                "creation" => Some(stored.creation.to_string()),
                other => stored.properties.get(other).cloned(),
            };
            if let Some(value) = value {
                props.insert(name.to_string(), value);
            }
        }
        Ok(props)
    }

    fn set_property(&mut self, snapshot: &SnapshotId, name: &str, value: &str) -> Result<()> {
        let index = self.locate(snapshot)?;
        if Faults::hits(&self.faults.tag, snapshot) {
            return Err(injected_fault("set_property", &snapshot.to_string()));
        }
        self.snapshots[index]
            .properties
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn take_snapshot(
        &mut self,
        dataset: &str,
        tag: &str,
        recursive: bool,
        properties: &Properties,
    ) -> Result<()> {
        let root = SnapshotId::new(dataset, tag)?;
        let root_name = root.to_string();
        self.ensure_dataset(dataset)?;
        if self.faults.tag.contains(dataset) || self.faults.tag.contains(&root_name) {
            return Err(injected_fault("take_snapshot", &root_name));
        }

        let targets: Vec<SnapshotId> = if recursive {
            self.subtree(dataset)
                .map(|d| SnapshotId::new(d.as_str(), tag))
                .collect::<Result<_>>()?
        } else {
            vec![root]
        };
        for id in &targets {
            self.ensure_absent(id)?;
        }

        let creation = self.tick("take_snapshot", &root_name, 1)?;
        self.clock = creation;
        self.snapshots.extend(targets.into_iter().map(|id| StoredSnapshot {
            id,
            creation,
            properties: properties.clone(),
        }));
        Ok(())
    }

    fn destroy_snapshot(&mut self, snapshot: &SnapshotId) -> Result<()> {
        let index = self.locate(snapshot)?;
        if Faults::hits(&self.faults.destroy, snapshot) {
            return Err(injected_fault("destroy_snapshot", &snapshot.to_string()));
        }
        self.snapshots.remove(index);
        Ok(())
    }
}
