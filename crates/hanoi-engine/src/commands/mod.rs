//! Rotation commands with boundary logging
//!
//! ## Logging Ownership
//!
//! The engine layer owns lifecycle logging for rotation runs:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Lower layers (store, core) use only `tracing::debug!()` and `warn!()`.

pub mod plan;
pub mod rotate;
pub mod simulate;
pub mod status;
