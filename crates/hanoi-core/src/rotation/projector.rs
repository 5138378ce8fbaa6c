//! History projection
//!
//! Turns the store's flat snapshot listing into the newest-first
//! [`RotationState`] the decision engine scans.

use crate::config::RotationConfig;
use crate::errors::Result;
use crate::model::{ClassLabel, ClassifiedSnapshot, SnapshotId};
use crate::store::SnapshotStore;

/// Newest-first history of one dataset's scheme snapshots
///
/// Built fresh for every run and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RotationState {
    dataset: String,
    entries: Vec<ClassifiedSnapshot>,
}

impl RotationState {
    /// Build a state, ordering `entries` newest first
    ///
    /// The sort is stable: equal creation times keep their input order, and
    /// entries without a creation time go after all timestamped ones.
    pub fn new(dataset: impl Into<String>, mut entries: Vec<ClassifiedSnapshot>) -> Self {
        entries.sort_by(|a, b| b.creation.cmp(&a.creation));
        Self {
            dataset: dataset.into(),
            entries,
        }
    }

    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    pub fn entries(&self) -> &[ClassifiedSnapshot] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at history position `ptr` (0 = newest)
    pub fn get(&self, ptr: usize) -> Option<&ClassifiedSnapshot> {
        self.entries.get(ptr)
    }

    pub fn newest(&self) -> Option<&ClassifiedSnapshot> {
        self.entries.first()
    }

    /// Every entry currently wearing `label`
    pub fn occupants(&self, label: ClassLabel) -> impl Iterator<Item = &ClassifiedSnapshot> {
        self.entries.iter().filter(move |e| e.wears(label))
    }

    /// The same history with one snapshot removed
    pub fn without(mut self, id: &SnapshotId) -> Self {
        self.entries.retain(|e| &e.id != id);
        self
    }
}

/// Project `all_snapshots` onto this scheme's history for `dataset`
///
/// Keeps only snapshots of `dataset` itself (a caller may pass a subtree
/// listing) whose tag carries the configured prefix, then reads their
/// classification. A failed or empty property read leaves the entry
/// unclassified instead of failing the projection.
pub fn project<S: SnapshotStore + ?Sized>(
    store: &S,
    dataset: &str,
    all_snapshots: &[SnapshotId],
    config: &RotationConfig,
) -> RotationState {
    let names = config.requested_properties();

    let entries = all_snapshots
        .iter()
        .filter(|id| id.dataset() == dataset && config.owns_tag(id.tag()))
        .map(|id| match store.get_properties(id, &names) {
            Ok(props) if !props.is_empty() => ClassifiedSnapshot::from_properties(
                id.clone(),
                &props,
                &config.class_property,
                &config.control_property,
            ),
            Ok(_) => {
                tracing::warn!(snapshot = %id, "no properties returned, treating as unclassified");
                ClassifiedSnapshot::unclassified(id.clone())
            }
            Err(e) => {
                tracing::warn!(snapshot = %id, error = %e, "property read failed, treating as unclassified");
                ClassifiedSnapshot::unclassified(id.clone())
            }
        })
        .collect();

    let state = RotationState::new(dataset, entries);
    tracing::debug!(dataset, history_len = state.len(), "projected rotation history");
    state
}

/// List `dataset`'s snapshots and project them
///
/// # Errors
///
/// Propagates a failed listing; property reads never fail the call.
pub fn load_state<S: SnapshotStore + ?Sized>(
    store: &S,
    dataset: &str,
    config: &RotationConfig,
) -> Result<RotationState> {
    let all = store.list_snapshots(dataset)?;
    Ok(project(store, dataset, &all, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::HanoiError;
    use crate::model::{ControlNumber, Properties};
    use std::collections::HashMap;

    /// Read-only store answering from a fixed table
    struct FixedStore {
        listing: Vec<SnapshotId>,
        props: HashMap<String, Properties>,
        broken: Vec<String>,
    }

    impl FixedStore {
        fn new() -> Self {
            Self {
                listing: Vec::new(),
                props: HashMap::new(),
                broken: Vec::new(),
            }
        }

        fn with(mut self, name: &str, creation: i64, class: &str, control: &str) -> Self {
            let id: SnapshotId = name.parse().unwrap();
            let mut p = Properties::new();
            p.insert("name".into(), name.into());
            p.insert("creation".into(), creation.to_string());
            p.insert("backup:class".into(), class.into());
            p.insert("backup:cycle_nr".into(), control.into());
            self.props.insert(name.to_string(), p);
            self.listing.push(id);
            self
        }

        fn with_broken(mut self, name: &str) -> Self {
            self.listing.push(name.parse().unwrap());
            self.broken.push(name.to_string());
            self
        }
    }

    impl SnapshotStore for FixedStore {
        fn list_snapshots(&self, _dataset: &str) -> Result<Vec<SnapshotId>> {
            Ok(self.listing.clone())
        }

        fn list_datasets(&self, root: &str) -> Result<Vec<String>> {
            Ok(vec![root.to_string()])
        }

        fn get_properties(&self, snapshot: &SnapshotId, names: &[&str]) -> Result<Properties> {
            let key = snapshot.to_string();
            if self.broken.contains(&key) {
                return Err(HanoiError::store_failure("get_properties", key, "io error"));
            }
            Ok(self
                .props
                .get(&key)
                .map(|p| {
                    p.iter()
                        .filter(|(k, _)| names.contains(&k.as_str()))
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect()
                })
                .unwrap_or_default())
        }

        fn set_property(&mut self, _: &SnapshotId, _: &str, _: &str) -> Result<()> {
            unreachable!("projection never writes")
        }

        fn take_snapshot(&mut self, _: &str, _: &str, _: bool, _: &Properties) -> Result<()> {
            unreachable!("projection never writes")
        }

        fn destroy_snapshot(&mut self, _: &SnapshotId) -> Result<()> {
            unreachable!("projection never writes")
        }
    }

    fn tags(state: &RotationState) -> Vec<&str> {
        state.entries().iter().map(|e| e.id.tag()).collect()
    }

    #[test]
    fn test_filters_prefix_and_dataset_and_sorts_newest_first() {
        let store = FixedStore::new()
            .with("tank/a@hanoi-1", 100, "E", "0")
            .with("tank/a@manual", 150, "A", "0")
            .with("tank/a@hanoi-3", 300, "A", "2")
            .with("tank/a/child@hanoi-9", 900, "A", "2")
            .with("tank/a@hanoi-2", 200, "D", "1");

        let state = load_state(&store, "tank/a", &RotationConfig::default()).unwrap();

        assert_eq!(tags(&state), vec!["hanoi-3", "hanoi-2", "hanoi-1"]);
        assert_eq!(state.newest().unwrap().control_number, Some(ControlNumber::new(2)));
    }

    #[test]
    fn test_equal_creation_keeps_listing_order() {
        let store = FixedStore::new()
            .with("tank@hanoi-x", 100, "B", "1")
            .with("tank@hanoi-y", 100, "C", "2")
            .with("tank@hanoi-z", 50, "E", "0");

        let state = load_state(&store, "tank", &RotationConfig::default()).unwrap();

        assert_eq!(tags(&state), vec!["hanoi-x", "hanoi-y", "hanoi-z"]);
    }

    #[test]
    fn test_failed_property_read_keeps_slot() {
        let store = FixedStore::new()
            .with("tank@hanoi-1", 100, "E", "0")
            .with_broken("tank@hanoi-2");

        let state = load_state(&store, "tank", &RotationConfig::default()).unwrap();

        assert_eq!(state.len(), 2);
        let broken = state.get(1).unwrap();
        assert_eq!(broken.id.tag(), "hanoi-2");
        assert_eq!(broken.class_label, None);
        assert_eq!(broken.creation, None);
    }

    #[test]
    fn test_projection_is_repeatable() {
        let store = FixedStore::new()
            .with("tank@hanoi-1", 100, "E", "0")
            .with("tank@hanoi-2", 100, "A", "1")
            .with_broken("tank@hanoi-3");
        let config = RotationConfig::default();

        let first = load_state(&store, "tank", &config).unwrap();
        let second = load_state(&store, "tank", &config).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_prefix() {
        let store = FixedStore::new()
            .with("pool@hanoi-1", 100, "E", "0")
            .with("pool@tower-1", 200, "E", "0");
        let config = RotationConfig::default().with_prefix("tower");

        let state = load_state(&store, "pool", &config).unwrap();

        assert_eq!(tags(&state), vec!["tower-1"]);
    }

    #[test]
    fn test_without_drops_one_entry() {
        let store = FixedStore::new()
            .with("tank@hanoi-1", 100, "E", "0")
            .with("tank@hanoi-2", 200, "unknown", "X");
        let state = load_state(&store, "tank", &RotationConfig::default()).unwrap();

        let trimmed = state.without(&"tank@hanoi-2".parse().unwrap());

        assert_eq!(tags(&trimmed), vec!["hanoi-1"]);
    }
}
