#![forbid(unsafe_code)]
//! tether-core library.
//!
//! Shared data model for the tether workspace: bead ledger records,
//! correlated git history, project configuration, and machine-readable
//! error codes.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` at I/O seams; typed errors where a
//!   caller needs to branch on the failure.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`,
//!   `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod history;
pub mod model;

pub use config::{CorrelateConfig, ProjectConfig, ScanConfig};
pub use history::{BeadEvent, BeadHistory, BeadMilestones, CorrelatedCommit, FileChange, HistoryReport};
pub use model::{Bead, BeadStatus};
