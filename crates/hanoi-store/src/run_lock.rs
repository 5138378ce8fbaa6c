//! Per-pool run lock
//!
//! Two rotations of the same dataset hierarchy must not interleave. A
//! recursive run over `tank` touches `tank/a`, so the lock is keyed by the
//! pool (first path component) rather than the exact dataset. The lock is a
//! file created with `create_new`, so creation either wins outright or
//! reports that another run got there first. Dropping the guard removes the
//! file.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::{io_error, HanoiError, Result};

/// Held lock for the pool containing one dataset; released on drop
#[derive(Debug)]
pub struct RunLock {
    dataset: String,
    path: PathBuf,
}

impl RunLock {
    /// Take the lock for the pool of `dataset` inside `dir`
    ///
    /// # Errors
    ///
    /// `RunLockHeld` (naming the pool) if the lock file already exists, `Io`
    /// if the directory or the file cannot be written.
    pub fn acquire(dir: &Path, dataset: &str) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|e| io_error("create_lock_dir", e))?;
        let pool = pool_of(dataset);
        let path = dir.join(lock_file_name(pool));

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(HanoiError::RunLockHeld {
                    dataset: pool.to_string(),
                });
            }
            Err(e) => return Err(io_error("acquire_run_lock", e)),
        };

        if let Err(e) = writeln!(file, "{}", std::process::id()) {
            let _ = fs::remove_file(&path);
            return Err(io_error("write_run_lock", e));
        }

        tracing::debug!(dataset, pool, path = %path.display(), "run lock acquired");
        Ok(Self {
            dataset: dataset.to_string(),
            path,
        })
    }

    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    pub fn pool(&self) -> &str {
        pool_of(&self.dataset)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(dataset = %self.dataset, "run lock released"),
            Err(e) => tracing::warn!(
                dataset = %self.dataset,
                path = %self.path.display(),
                error = %e,
                "failed to remove run lock"
            ),
        }
    }
}

/// Pool name of a dataset path
pub fn pool_of(dataset: &str) -> &str {
    dataset.split('/').next().unwrap_or(dataset)
}

/// Lock file name for a pool
pub fn lock_file_name(pool: &str) -> String {
    format!("hanoi-{}.lock", pool)
}
