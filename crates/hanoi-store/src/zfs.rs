//! `zfs` command-line backend
//!
//! Every primitive is one `zfs` invocation. Output is read in scripting mode
//! (`-H`, tab separated, no header) with exact numbers (`-p`).

use std::process::Command;

use hanoi_core::model::{Properties, SnapshotId};
use hanoi_core::store::SnapshotStore;

use crate::errors::{command_failed, HanoiError, Result};

pub const DEFAULT_ZFS_BINARY: &str = "/sbin/zfs";

const NO_DATASETS: &str = "no datasets available";
/// Dataset types a recursive snapshot reaches
const DATASET_TYPES: &str = "filesystem,volume";
const DOES_NOT_EXIST: &str = "does not exist";

/// Exit status and combined stdout/stderr of one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    pub output: String,
}

impl CommandOutput {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            output: output.into(),
        }
    }

    pub fn failure(exit_code: i32, output: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            output: output.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs external programs
///
/// Implemented by [`SystemRunner`] for real use and by scripted fakes in tests.
pub trait CommandRunner {
    /// Run `program` with `args` and wait for it to exit
    ///
    /// # Errors
    ///
    /// Returns the spawn error when the program could not be started.
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput>;
}

/// Spawns real processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput> {
        let out = Command::new(program).args(args).output()?;
        let mut output = String::from_utf8_lossy(&out.stdout).into_owned();
        output.push_str(&String::from_utf8_lossy(&out.stderr));
        Ok(CommandOutput {
            exit_code: out.status.code(),
            output: output.trim_end().to_string(),
        })
    }
}

/// Snapshot store backed by the `zfs` binary
#[derive(Debug, Clone)]
pub struct ZfsCli<R = SystemRunner> {
    binary: String,
    runner: R,
}

impl ZfsCli<SystemRunner> {
    pub fn new() -> Self {
        Self::with_runner(DEFAULT_ZFS_BINARY, SystemRunner)
    }
}

impl Default for ZfsCli<SystemRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner> ZfsCli<R> {
    pub fn with_runner(binary: impl Into<String>, runner: R) -> Self {
        Self {
            binary: binary.into(),
            runner,
        }
    }

    /// Use a different `zfs` binary
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn exec(&self, op: &str, target: &str, args: Vec<String>) -> Result<String> {
        tracing::debug!(op, target, args = %args.join(" "), "running zfs");

        let out = self.runner.run(&self.binary, &args).map_err(|e| {
            HanoiError::store_failure(op, target, format!("failed to run {}: {}", self.binary, e))
        })?;

        if out.is_success() {
            return Ok(out.output);
        }
        if out.output.contains(DOES_NOT_EXIST) {
            return Err(HanoiError::not_found(target));
        }
        Err(command_failed(op, target, out.exit_code, &out.output))
    }

    fn list(&self, op: &str, root: &str, args: &[&str]) -> Result<Vec<String>> {
        let output = self.exec(op, root, strings(args))?;
        if output.starts_with(NO_DATASETS) {
            return Ok(Vec::new());
        }
        Ok(output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

impl<R: CommandRunner> SnapshotStore for ZfsCli<R> {
    fn list_snapshots(&self, dataset: &str) -> Result<Vec<SnapshotId>> {
        let args = ["list", "-H", "-d", "1", "-o", "name", "-t", "snapshot", dataset];
        self.list("list_snapshots", dataset, &args)?
            .iter()
            .map(|name| name.parse())
            .collect()
    }

    fn list_datasets(&self, root: &str) -> Result<Vec<String>> {
        let args = ["list", "-rH", "-o", "name", "-t", DATASET_TYPES, root];
        self.list("list_datasets", root, &args)
    }

    fn get_properties(&self, snapshot: &SnapshotId, names: &[&str]) -> Result<Properties> {
        let target = snapshot.to_string();
        let args = vec![
            "get".to_string(),
            "-Hp".to_string(),
            "-o".to_string(),
            "property,value".to_string(),
            names.join(","),
            target.clone(),
        ];
        let output = self.exec("get_properties", &target, args)?;
        Ok(parse_property_lines(&output, names))
    }

    fn set_property(&mut self, snapshot: &SnapshotId, name: &str, value: &str) -> Result<()> {
        let target = snapshot.to_string();
        let args = vec!["set".to_string(), format!("{}={}", name, value), target.clone()];
        self.exec("set_property", &target, args)?;
        Ok(())
    }

    fn take_snapshot(
        &mut self,
        dataset: &str,
        tag: &str,
        recursive: bool,
        properties: &Properties,
    ) -> Result<()> {
        let target = SnapshotId::new(dataset, tag)?.to_string();
        let mut args = vec!["snapshot".to_string()];
        if recursive {
            args.push("-r".to_string());
        }
        for (name, value) in properties {
            args.push("-o".to_string());
            args.push(format!("{}={}", name, value));
        }
        args.push(target.clone());
        self.exec("take_snapshot", &target, args)?;
        Ok(())
    }

    fn destroy_snapshot(&mut self, snapshot: &SnapshotId) -> Result<()> {
        let target = snapshot.to_string();
        self.exec("destroy_snapshot", &target, vec!["destroy".to_string(), target.clone()])?;
        Ok(())
    }
}

/// Parse `property<TAB>value` lines, keeping only requested names
fn parse_property_lines(output: &str, names: &[&str]) -> Properties {
    output
        .lines()
        .filter_map(|line| {
            line.split_once('\t')
                .or_else(|| line.trim().split_once(char::is_whitespace))
        })
        .map(|(name, value)| (name.trim(), value.trim()))
        .filter(|(name, _)| names.contains(name))
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| a.to_string()).collect()
}
