use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::HanoiError;
use crate::model::{ClassLabel, ControlNumber};

/// Property name → value mapping as returned by the snapshot store
pub type Properties = BTreeMap<String, String>;

/// Identity of one physical snapshot: `dataset@tag`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct SnapshotId {
    dataset: String,
    tag: String,
}

impl SnapshotId {
    /// Build an identity from its two halves
    ///
    /// # Errors
    ///
    /// Returns `InvalidSnapshotName` if either half is empty or contains `@`.
    pub fn new(dataset: impl Into<String>, tag: impl Into<String>) -> Result<Self, HanoiError> {
        let dataset = dataset.into();
        let tag = tag.into();
        if dataset.is_empty() || tag.is_empty() || dataset.contains('@') || tag.contains('@') {
            return Err(HanoiError::InvalidSnapshotName {
                name: format!("{}@{}", dataset, tag),
            });
        }
        Ok(Self { dataset, tag })
    }

    /// Dataset this snapshot belongs to
    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    /// Tag (the part after `@`)
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl FromStr for SnapshotId {
    type Err = HanoiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('@') {
            Some((dataset, tag)) => SnapshotId::new(dataset, tag),
            None => Err(HanoiError::InvalidSnapshotName {
                name: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for SnapshotId {
    type Error = HanoiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SnapshotId> for String {
    fn from(id: SnapshotId) -> Self {
        id.to_string()
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.dataset, self.tag)
    }
}

/// One snapshot of this rotation scheme together with its classification
///
/// Every field except the identity may be absent: legacy or hand-made
/// snapshots, or ones whose properties could not be read, still occupy a
/// position in the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedSnapshot {
    /// `dataset@tag`
    pub id: SnapshotId,

    /// Creation time in unix seconds; the only sort key
    pub creation: Option<i64>,

    /// Retention class currently worn by the snapshot
    pub class_label: Option<ClassLabel>,

    /// Diagnostic cycle counter recorded at rotation time
    pub control_number: Option<ControlNumber>,
}

impl ClassifiedSnapshot {
    /// A snapshot with no readable classification
    pub fn unclassified(id: SnapshotId) -> Self {
        Self {
            id,
            creation: None,
            class_label: None,
            control_number: None,
        }
    }

    /// Build from raw store properties
    ///
    /// Unparseable values become `None`; the store's `-` placeholder for an
    /// unset user property is treated the same way.
    pub fn from_properties(
        id: SnapshotId,
        props: &Properties,
        class_property: &str,
        control_property: &str,
    ) -> Self {
        let value = |name: &str| props.get(name).map(String::as_str).filter(|v| *v != "-");

        Self {
            id,
            creation: value("creation").and_then(|v| v.trim().parse().ok()),
            class_label: value(class_property).and_then(|v| v.parse().ok()),
            control_number: value(control_property).and_then(|v| v.parse().ok()),
        }
    }

    /// Whether this snapshot currently wears the given class
    pub fn wears(&self, label: ClassLabel) -> bool {
        self.class_label == Some(label)
    }
}
