//! Run reports
//!
//! Serializable summaries of one orchestrator run, rendered by the CLI as
//! text or JSON.

use hanoi_core::model::RetentionClass;
use hanoi_core::rotation::RotationOutcome;
use hanoi_core_types::RunId;
use serde::{Deserialize, Serialize};

use crate::commands::plan::RotationPlan;

/// What happened to one dataset during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DatasetRotation {
    /// New generation tagged; destroy failures, if any, are in the outcome
    Rotated(RotationOutcome),
    /// Dry run: what would have happened
    Planned(RotationPlan),
    /// The dataset could not be rotated; siblings were still processed
    Failed {
        dataset: String,
        code: String,
        error: String,
    },
}

impl DatasetRotation {
    pub fn dataset(&self) -> &str {
        match self {
            DatasetRotation::Rotated(outcome) => &outcome.dataset,
            DatasetRotation::Planned(plan) => &plan.dataset,
            DatasetRotation::Failed { dataset, .. } => dataset,
        }
    }

    /// Class assigned (or planned) for the new generation
    pub fn class(&self) -> Option<RetentionClass> {
        match self {
            DatasetRotation::Rotated(outcome) => Some(outcome.class),
            DatasetRotation::Planned(plan) => Some(plan.class),
            DatasetRotation::Failed { .. } => None,
        }
    }

    pub fn destroyed_count(&self) -> usize {
        match self {
            DatasetRotation::Rotated(outcome) => outcome.destroyed.len(),
            _ => 0,
        }
    }

    /// Rotated with every obsolete snapshot gone, or planned
    pub fn is_clean(&self) -> bool {
        match self {
            DatasetRotation::Rotated(outcome) => outcome.is_clean(),
            DatasetRotation::Planned(_) => true,
            DatasetRotation::Failed { .. } => false,
        }
    }

    pub fn outcome(&self) -> Option<&RotationOutcome> {
        match self {
            DatasetRotation::Rotated(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn plan(&self) -> Option<&RotationPlan> {
        match self {
            DatasetRotation::Planned(plan) => Some(plan),
            _ => None,
        }
    }
}

/// Result of one `rotate_dataset` or `rotate_hierarchy` run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationReport {
    pub run_id: RunId,
    /// Dataset the run was started on
    pub root: String,
    /// Tag shared by every snapshot taken in this run
    pub tag: String,
    pub recursive: bool,
    pub dry_run: bool,
    /// One entry per dataset, root first
    pub datasets: Vec<DatasetRotation>,
}

impl RotationReport {
    pub fn entry(&self, dataset: &str) -> Option<&DatasetRotation> {
        self.datasets.iter().find(|d| d.dataset() == dataset)
    }

    pub fn failed_count(&self) -> usize {
        self.datasets
            .iter()
            .filter(|d| matches!(d, DatasetRotation::Failed { .. }))
            .count()
    }

    /// No failed dataset and no failed destroy anywhere
    pub fn is_clean(&self) -> bool {
        self.datasets.iter().all(DatasetRotation::is_clean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(datasets: Vec<DatasetRotation>) -> RotationReport {
        RotationReport {
            run_id: RunId::from_string("run-1".to_string()),
            root: "tank".to_string(),
            tag: "hanoi-20240101000000".to_string(),
            recursive: true,
            dry_run: false,
            datasets,
        }
    }

    fn failed(dataset: &str) -> DatasetRotation {
        DatasetRotation::Failed {
            dataset: dataset.to_string(),
            code: "ERR_TAG_FAILED".to_string(),
            error: "boom".to_string(),
        }
    }

    #[test]
    fn test_failed_entry_is_not_clean() {
        let report = report(vec![failed("tank/a")]);

        assert_eq!(report.failed_count(), 1);
        assert!(!report.is_clean());
        assert_eq!(report.entry("tank/a").map(DatasetRotation::dataset), Some("tank/a"));
        assert!(report.entry("tank/b").is_none());
    }

    #[test]
    fn test_failed_entry_serializes_with_status() {
        let json = serde_json::to_value(failed("tank/a")).unwrap();

        assert_eq!(json["status"], "failed");
        assert_eq!(json["dataset"], "tank/a");
        assert_eq!(json["code"], "ERR_TAG_FAILED");
    }

    #[test]
    fn test_empty_report_is_clean() {
        assert!(report(Vec::new()).is_clean());
    }
}
