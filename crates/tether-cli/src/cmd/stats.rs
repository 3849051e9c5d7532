//! `tether stats` - snapshot and index statistics.

use std::io::Write;
use std::path::Path;

use clap::Args;
use serde::Serialize;
use tether_core::config::ProjectConfig;
use tether_correlate::{FileIndexStats, build_file_index};

use crate::output::{OutputMode, render};
use crate::snapshot;

/// Arguments for `tether stats`.
#[derive(Args, Debug, Default)]
pub struct StatsArgs {}

/// Report payload for `tether stats`.
#[derive(Debug, Serialize)]
pub struct ScanStats {
    pub beads: usize,
    pub open_beads: usize,
    pub commits: usize,
    pub correlated_commits: usize,
    pub index: FileIndexStats,
}

/// Execute `tether stats`.
pub fn run_stats(
    _args: &StatsArgs,
    output: OutputMode,
    repo_root: &Path,
    config: &ProjectConfig,
    ledger_override: Option<&Path>,
) -> anyhow::Result<()> {
    let snapshot = snapshot::load_snapshot(output, repo_root, config, ledger_override)?;
    let index = build_file_index(Some(&snapshot.report));

    let correlated_commits = snapshot
        .commits
        .iter()
        .filter(|c| snapshot.report.is_correlated(&c.sha))
        .count();
    let open_beads = snapshot
        .beads
        .iter()
        .filter(|b| !b.status.is_closed())
        .count();

    let payload = ScanStats {
        beads: snapshot.beads.len(),
        open_beads,
        commits: snapshot.commits.len(),
        correlated_commits,
        index: index.stats,
    };

    render(output, &payload, |payload, w| render_stats_human(payload, w))
}

fn render_stats_human(stats: &ScanStats, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "Snapshot")?;
    writeln!(w, "  beads:              {} ({} open)", stats.beads, stats.open_beads)?;
    writeln!(w, "  commits:            {}", stats.commits)?;
    writeln!(w, "  correlated commits: {}", stats.correlated_commits)?;

    writeln!(w, "\nFile index")?;
    writeln!(w, "  files indexed:      {}", stats.index.total_files)?;
    writeln!(w, "  bead links:         {}", stats.index.total_bead_links)?;
    writeln!(w, "  multi-bead files:   {}", stats.index.files_with_multiple_beads)?;
    Ok(())
}
