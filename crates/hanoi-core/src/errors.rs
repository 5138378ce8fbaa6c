use thiserror::Error;

/// Result type alias using HanoiError
pub type Result<T> = std::result::Result<T, HanoiError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code used in log events, CLI output
/// and test assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Configuration
    InvalidClassCount,
    InvalidConfig,

    // Snapshot data
    InvalidSnapshotName,
    NotFound,

    // Store
    StoreFailure,
    TagFailed,
    DestroyFailed,

    // Coordination
    LockHeld,

    // Integration/IO
    Io,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidClassCount => "ERR_INVALID_CLASS_COUNT",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::InvalidSnapshotName => "ERR_INVALID_SNAPSHOT_NAME",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::StoreFailure => "ERR_STORE_FAILURE",
            ExErrorKind::TagFailed => "ERR_TAG_FAILED",
            ExErrorKind::DestroyFailed => "ERR_DESTROY_FAILED",
            ExErrorKind::LockHeld => "ERR_LOCK_HELD",
            ExErrorKind::Io => "ERR_IO",
        }
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling and context
/// for operators reading the logs.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    dataset: Option<String>,
    snapshot: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            dataset: None,
            snapshot: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add dataset context
    pub fn with_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset = Some(dataset.into());
        self
    }

    /// Add snapshot context
    pub fn with_snapshot(mut self, snapshot: impl Into<String>) -> Self {
        self.snapshot = Some(snapshot.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the dataset context, if any
    pub fn dataset(&self) -> Option<&str> {
        self.dataset.as_deref()
    }

    /// Get the snapshot context, if any
    pub fn snapshot(&self) -> Option<&str> {
        self.snapshot.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(dataset) = &self.dataset {
            write!(f, " (dataset: {})", dataset)?;
        }
        if let Some(snapshot) = &self.snapshot {
            write!(f, " (snapshot: {})", snapshot)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for rotation operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HanoiError {
    // ===== Configuration Errors =====
    /// Retention class count outside 1..=26
    #[error("Invalid class count {count}: must be between 1 and 26")]
    InvalidClassCount { count: usize },

    /// Any other unusable configuration value
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // ===== Snapshot Data Errors =====
    /// A snapshot name that is not `dataset@tag`
    #[error("Invalid snapshot name: {name}")]
    InvalidSnapshotName { name: String },

    /// Dataset or snapshot does not exist in the store
    #[error("Not found: {target}")]
    NotFound { target: String },

    // ===== Store Errors =====
    /// A snapshot store primitive failed
    #[error("Store operation '{op}' failed for {target}: {message}")]
    StoreFailure {
        op: String,
        target: String,
        message: String,
    },

    // ===== Coordination Errors =====
    /// Another rotation run holds the lock for this dataset
    #[error("Rotation already running for dataset: {dataset}")]
    RunLockHeld { dataset: String },

    // ===== Integration Errors =====
    /// Local filesystem error (run lock files)
    #[error("IO error during {op}: {message}")]
    Io { op: String, message: String },
}

impl HanoiError {
    /// Build a `StoreFailure` for the given primitive and target
    pub fn store_failure(
        op: impl Into<String>,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        HanoiError::StoreFailure {
            op: op.into(),
            target: target.into(),
            message: message.into(),
        }
    }

    /// Build a `NotFound` for the given target
    pub fn not_found(target: impl Into<String>) -> Self {
        HanoiError::NotFound {
            target: target.into(),
        }
    }

    /// Whether this error means the target simply does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, HanoiError::NotFound { .. })
    }

    /// Whether this is a configuration error (raised before any store call)
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            HanoiError::InvalidClassCount { .. } | HanoiError::InvalidConfig { .. }
        )
    }
}

impl From<HanoiError> for ExError {
    fn from(err: HanoiError) -> Self {
        match err {
            HanoiError::InvalidClassCount { count } => {
                ExError::new(ExErrorKind::InvalidClassCount)
                    .with_op("class_table")
                    .with_message(format!("Class count {} outside 1..=26", count))
            }

            HanoiError::InvalidConfig { reason } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(reason)
            }

            HanoiError::InvalidSnapshotName { name } => {
                ExError::new(ExErrorKind::InvalidSnapshotName)
                    .with_snapshot(name)
                    .with_message("Snapshot name must be dataset@tag")
            }

            HanoiError::NotFound { target } => ExError::new(ExErrorKind::NotFound)
                .with_message(format!("{} does not exist", target)),

            HanoiError::StoreFailure {
                op,
                target,
                message,
            } => {
                let kind = match op.as_str() {
                    "set_property" | "take_snapshot" => ExErrorKind::TagFailed,
                    "destroy_snapshot" => ExErrorKind::DestroyFailed,
                    _ => ExErrorKind::StoreFailure,
                };
                let err = ExError::new(kind).with_op(op).with_message(message);
                if target.contains('@') {
                    err.with_snapshot(target)
                } else {
                    err.with_dataset(target)
                }
            }

            HanoiError::RunLockHeld { dataset } => ExError::new(ExErrorKind::LockHeld)
                .with_op("acquire_run_lock")
                .with_dataset(dataset)
                .with_message("Another rotation run holds the lock"),

            HanoiError::Io { op, message } => ExError::new(ExErrorKind::Io)
                .with_op(op)
                .with_message(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes_are_stable() {
        let cases = [
            (ExErrorKind::InvalidClassCount, "ERR_INVALID_CLASS_COUNT"),
            (ExErrorKind::StoreFailure, "ERR_STORE_FAILURE"),
            (ExErrorKind::TagFailed, "ERR_TAG_FAILED"),
            (ExErrorKind::DestroyFailed, "ERR_DESTROY_FAILED"),
            (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
            (ExErrorKind::LockHeld, "ERR_LOCK_HELD"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_store_failure_on_snapshot_maps_to_tag_failed() {
        let err = HanoiError::store_failure("set_property", "tank/a@hanoi-1", "permission denied");
        let ex: ExError = err.into();

        assert_eq!(ex.kind(), ExErrorKind::TagFailed);
        assert_eq!(ex.snapshot(), Some("tank/a@hanoi-1"));
        assert_eq!(ex.dataset(), None);
        assert_eq!(ex.message(), "permission denied");
    }

    #[test]
    fn test_store_failure_on_dataset_keeps_generic_kind() {
        let err = HanoiError::store_failure("list_snapshots", "tank/a", "exit 1");
        let ex: ExError = err.into();

        assert_eq!(ex.kind(), ExErrorKind::StoreFailure);
        assert_eq!(ex.dataset(), Some("tank/a"));
    }

    #[test]
    fn test_config_errors_are_classified() {
        assert!(HanoiError::InvalidClassCount { count: 0 }.is_config_error());
        assert!(!HanoiError::not_found("tank").is_config_error());
        assert!(HanoiError::not_found("tank").is_not_found());
    }

    #[test]
    fn test_display_includes_code_and_context() {
        let ex = ExError::new(ExErrorKind::DestroyFailed)
            .with_op("destroy_snapshot")
            .with_snapshot("tank@hanoi-1")
            .with_message("dataset is busy");
        let text = ex.to_string();

        assert!(text.starts_with("[ERR_DESTROY_FAILED]"));
        assert!(text.contains("destroy_snapshot"));
        assert!(text.contains("tank@hanoi-1"));
    }
}
