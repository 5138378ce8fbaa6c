//! Hanoi Store - snapshot store backends
//!
//! Provides:
//! - `ZfsCli`: drives the `zfs` binary through a swappable command runner
//! - `MemoryStore`: in-memory dataset tree used by tests and simulations
//! - `RunLock`: per-pool lock file keeping two runs apart

pub mod errors;
pub mod memory;
pub mod run_lock;
pub mod zfs;

// Re-export key types
pub use errors::Result;
pub use memory::MemoryStore;
pub use run_lock::RunLock;
pub use zfs::{CommandOutput, CommandRunner, SystemRunner, ZfsCli, DEFAULT_ZFS_BINARY};
