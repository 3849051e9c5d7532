//! `tether glob` - which beads have touched files matching a pattern.

use std::path::Path;

use clap::Args;
use tether_core::config::ProjectConfig;
use tether_core::error::ErrorCode;
use tether_correlate::FileLookup;

use crate::cmd::render_lookup_human;
use crate::output::{CliError, OutputMode, render, render_error};
use crate::snapshot;

/// Arguments for `tether glob`.
#[derive(Args, Debug)]
pub struct GlobArgs {
    /// Glob pattern matched against every indexed path (quote it).
    pub pattern: String,
}

/// Execute `tether glob`.
pub fn run_glob(
    args: &GlobArgs,
    output: OutputMode,
    repo_root: &Path,
    config: &ProjectConfig,
    ledger_override: Option<&Path>,
) -> anyhow::Result<()> {
    let snapshot = snapshot::load_snapshot(output, repo_root, config, ledger_override)?;
    let lookup = FileLookup::new(&snapshot.report);

    let result = match lookup.lookup_by_glob(&args.pattern) {
        Ok(result) => result,
        Err(err) => {
            let code = ErrorCode::InvalidGlobPattern;
            render_error(
                output,
                &CliError::with_details(
                    err.to_string(),
                    code.hint().unwrap_or_default(),
                    code.code(),
                ),
            )?;
            anyhow::bail!("invalid glob pattern {:?}", args.pattern);
        }
    };

    render(output, &result, |result, w| render_lookup_human(result, w))
}
