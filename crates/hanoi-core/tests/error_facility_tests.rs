use hanoi_core::errors::{ExError, ExErrorKind, HanoiError};

#[test]
fn test_invalid_class_count_verifiable_by_kind() {
    let ex_err: ExError = HanoiError::InvalidClassCount { count: 27 }.into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidClassCount);
    assert_eq!(ex_err.code(), "ERR_INVALID_CLASS_COUNT");
    assert!(ex_err.message().contains("27"));
}

#[test]
fn test_not_found_distinct_from_store_failure() {
    let missing: ExError = HanoiError::not_found("tank/gone").into();
    let broken: ExError = HanoiError::store_failure("list_snapshots", "tank", "exit 2").into();

    assert_eq!(missing.kind(), ExErrorKind::NotFound);
    assert_eq!(broken.kind(), ExErrorKind::StoreFailure);
    assert_ne!(missing.code(), broken.code());
}

#[test]
fn test_tag_failures_classified() {
    for op in ["set_property", "take_snapshot"] {
        let ex: ExError = HanoiError::store_failure(op, "tank@hanoi-1", "denied").into();
        assert_eq!(ex.kind(), ExErrorKind::TagFailed, "op {}", op);
        assert_eq!(ex.op(), Some(op));
    }
}

#[test]
fn test_lock_held_carries_dataset() {
    let ex: ExError = HanoiError::RunLockHeld {
        dataset: "tank/home".to_string(),
    }
    .into();

    assert_eq!(ex.kind(), ExErrorKind::LockHeld);
    assert_eq!(ex.dataset(), Some("tank/home"));
}

#[test]
fn test_invalid_snapshot_name_carries_name() {
    let err = "no-at-sign".parse::<hanoi_core::SnapshotId>().unwrap_err();
    let ex: ExError = err.into();

    assert_eq!(ex.kind(), ExErrorKind::InvalidSnapshotName);
    assert_eq!(ex.snapshot(), Some("no-at-sign"));
}

#[test]
fn test_hanoi_error_display() {
    let err = HanoiError::store_failure("destroy_snapshot", "tank@hanoi-1", "busy");
    assert_eq!(
        err.to_string(),
        "Store operation 'destroy_snapshot' failed for tank@hanoi-1: busy"
    );
}

#[test]
fn test_every_kind_reachable_from_a_domain_error() {
    let errors = [
        HanoiError::InvalidClassCount { count: 0 },
        HanoiError::InvalidConfig {
            reason: "empty prefix".to_string(),
        },
        HanoiError::InvalidSnapshotName {
            name: "tank".to_string(),
        },
        HanoiError::not_found("tank/gone"),
        HanoiError::store_failure("list_snapshots", "tank", "exit 1"),
        HanoiError::store_failure("take_snapshot", "tank@hanoi-1", "exit 1"),
        HanoiError::store_failure("destroy_snapshot", "tank@hanoi-1", "busy"),
        HanoiError::RunLockHeld {
            dataset: "tank".to_string(),
        },
        HanoiError::Io {
            op: "acquire_run_lock".to_string(),
            message: "read-only file system".to_string(),
        },
    ];

    let mut codes: Vec<&str> = errors
        .into_iter()
        .map(|e| ExError::from(e).code())
        .collect();
    codes.sort_unstable();
    codes.dedup();

    assert_eq!(
        codes,
        vec![
            "ERR_DESTROY_FAILED",
            "ERR_INVALID_CLASS_COUNT",
            "ERR_INVALID_CONFIG",
            "ERR_INVALID_SNAPSHOT_NAME",
            "ERR_IO",
            "ERR_LOCK_HELD",
            "ERR_NOT_FOUND",
            "ERR_STORE_FAILURE",
            "ERR_TAG_FAILED",
        ]
    );
}
