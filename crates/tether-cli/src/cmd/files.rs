//! `tether files` - which beads have touched a file or directory.

use std::path::Path;

use clap::Args;
use tether_core::config::ProjectConfig;
use tether_correlate::FileLookup;

use crate::cmd::render_lookup_human;
use crate::output::{OutputMode, render};
use crate::snapshot;

/// Arguments for `tether files`.
#[derive(Args, Debug)]
pub struct FilesArgs {
    /// File or directory path to look up.
    pub path: String,
}

/// Execute `tether files`.
pub fn run_files(
    args: &FilesArgs,
    output: OutputMode,
    repo_root: &Path,
    config: &ProjectConfig,
    ledger_override: Option<&Path>,
) -> anyhow::Result<()> {
    let snapshot = snapshot::load_snapshot(output, repo_root, config, ledger_override)?;
    let lookup = FileLookup::new(&snapshot.report);
    let result = lookup.lookup_by_file(&args.path);

    render(output, &result, |result, w| render_lookup_human(result, w))
}
