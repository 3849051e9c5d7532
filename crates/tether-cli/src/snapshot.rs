//! Shared command plumbing: load the ledger, read history, and assemble
//! the correlation snapshot every query command starts from.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tether_core::config::ProjectConfig;
use tether_core::error::ErrorCode;
use tether_core::history::{CorrelatedCommit, HistoryReport};
use tether_core::model::Bead;

use crate::git::log::{self, LogOptions};
use crate::output::{CliError, OutputMode, render_error};
use crate::{git, ledger};

/// One loaded snapshot: the ledger, the full commit history, and the
/// assembled history report.
#[derive(Debug)]
pub struct Snapshot {
    pub beads: Vec<Bead>,
    pub commits: Vec<CorrelatedCommit>,
    pub report: HistoryReport,
}

/// Resolve the ledger path from the override flag or project config.
#[must_use]
pub fn ledger_path(
    repo_root: &Path,
    config: &ProjectConfig,
    ledger_override: Option<&Path>,
) -> PathBuf {
    ledger_override.map_or_else(|| repo_root.join(&config.scan.ledger), Path::to_path_buf)
}

/// Load the full snapshot, rendering a structured error when the ledger is
/// missing.
///
/// # Errors
///
/// Returns an error when the ledger is absent or malformed, or when git
/// history cannot be read.
pub fn load_snapshot(
    output: OutputMode,
    repo_root: &Path,
    config: &ProjectConfig,
    ledger_override: Option<&Path>,
) -> Result<Snapshot> {
    let ledger_path = ledger_path(repo_root, config, ledger_override);
    if !ledger_path.exists() {
        let code = ErrorCode::LedgerNotFound;
        render_error(
            output,
            &CliError::with_details(
                format!("{}: {}", code.message(), ledger_path.display()),
                code.hint().unwrap_or_default(),
                code.code(),
            ),
        )?;
        anyhow::bail!("bead ledger not found at {}", ledger_path.display());
    }

    let beads = ledger::load_beads(&ledger_path)?;
    let commits = log::read_commits(repo_root, &config.scan.git_binary, &LogOptions::default())?;
    let report = git::extract::build_history_report(&beads, &commits, &config.scan.id_prefix)?;

    Ok(Snapshot {
        beads,
        commits,
        report,
    })
}
