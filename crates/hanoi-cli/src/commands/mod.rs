//! Subcommands and the options they share

pub mod plan;
pub mod rotate;
pub mod simulate;
pub mod status;

use clap::Args;
use hanoi_core::config::{
    RotationConfig, DEFAULT_CLASS_COUNT, DEFAULT_CLASS_PROPERTY, DEFAULT_CONTROL_PROPERTY,
    DEFAULT_PREFIX,
};
use hanoi_store::{ZfsCli, DEFAULT_ZFS_BINARY};
use serde::Serialize;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Scheme settings shared by every subcommand
#[derive(Debug, Args)]
pub struct SchemeArgs {
    /// Number of retention classes (1-26)
    #[arg(long, env = "HANOI_CLASSES", default_value_t = DEFAULT_CLASS_COUNT)]
    pub classes: usize,

    /// Tag prefix of snapshots owned by the rotation
    #[arg(long, env = "HANOI_PREFIX", default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    /// User property holding the class label
    #[arg(long, default_value = DEFAULT_CLASS_PROPERTY)]
    pub class_property: String,

    /// User property holding the control number
    #[arg(long, default_value = DEFAULT_CONTROL_PROPERTY)]
    pub control_property: String,
}

impl SchemeArgs {
    pub fn config(&self) -> RotationConfig {
        RotationConfig::new(self.classes)
            .with_prefix(self.prefix.as_str())
            .with_class_property(self.class_property.as_str())
            .with_control_property(self.control_property.as_str())
    }
}

/// Target dataset and the `zfs` binary that reaches it
#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Dataset to operate on, e.g. tank/home
    #[arg(long)]
    pub dataset: String,

    /// Path of the zfs binary
    #[arg(long, env = "HANOI_ZFS", default_value = DEFAULT_ZFS_BINARY)]
    pub zfs: String,
}

impl TargetArgs {
    pub fn store(&self) -> ZfsCli {
        ZfsCli::new().with_binary(self.zfs.as_str())
    }
}

/// Print `value` as pretty JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
