//! Error handling for hanoi-store
//!
//! Store backends report through `HanoiError` so the rotation core can tell
//! a missing target from a failed primitive.

pub use hanoi_core::errors::{HanoiError, Result};

/// Create an IO error for a local filesystem step
pub fn io_error(operation: &str, err: std::io::Error) -> HanoiError {
    HanoiError::Io {
        op: operation.to_string(),
        message: err.to_string(),
    }
}

/// Create a store failure from a command that exited non-zero
pub fn command_failed(op: &str, target: &str, exit_code: Option<i32>, output: &str) -> HanoiError {
    let status = match exit_code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    };
    let message = if output.is_empty() {
        status
    } else {
        format!("{}: {}", status, output)
    };
    HanoiError::store_failure(op, target, message)
}

/// Create a store failure for a primitive refused by an injected fault
pub fn injected_fault(op: &str, target: &str) -> HanoiError {
    HanoiError::store_failure(op, target, "injected fault")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_carries_exit_code_and_output() {
        let err = command_failed("destroy_snapshot", "tank@hanoi-1", Some(1), "dataset is busy");

        assert_eq!(
            err.to_string(),
            "Store operation 'destroy_snapshot' failed for tank@hanoi-1: exit code 1: dataset is busy"
        );
    }

    #[test]
    fn test_command_failed_without_output() {
        let err = command_failed("list_snapshots", "tank", None, "");

        assert!(err.to_string().ends_with("terminated by signal"));
    }

    #[test]
    fn test_io_error_keeps_operation() {
        let err = io_error(
            "acquire_run_lock",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );

        assert!(matches!(err, HanoiError::Io { ref op, .. } if op == "acquire_run_lock"));
    }
}
