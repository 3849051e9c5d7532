//! `tether orphans` - detect commits that lack a bead linkage and rank
//! their probable beads.

use std::io::Write;
use std::path::Path;

use clap::Args;
use tether_core::config::ProjectConfig;
use tether_correlate::{CancelFlag, DetectOptions, OrphanDetector, OrphanReport};

use crate::git::log::{self, LogOptions};
use crate::output::{OutputMode, render};
use crate::snapshot;

/// Arguments for `tether orphans`.
#[derive(Args, Debug)]
pub struct OrphansArgs {
    /// Examine at most this many commits.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Only examine commits newer than this (git date syntax, e.g. "2 weeks ago").
    #[arg(long)]
    pub since: Option<String>,

    /// Override the configured suspicion threshold.
    #[arg(long)]
    pub threshold: Option<u32>,

    /// Also re-score commits that already have a bead linkage.
    #[arg(long)]
    pub rescore: bool,
}

/// Execute `tether orphans`.
pub fn run_orphans(
    args: &OrphansArgs,
    output: OutputMode,
    repo_root: &Path,
    config: &ProjectConfig,
    ledger_override: Option<&Path>,
) -> anyhow::Result<()> {
    // The history report always comes from the complete snapshot; the
    // options only constrain which commits get scanned.
    let snapshot = snapshot::load_snapshot(output, repo_root, config, ledger_override)?;

    let opts = DetectOptions {
        limit: args.limit,
        since: args.since.clone(),
        rescore_correlated: args.rescore,
        min_suspicion: args.threshold,
    };

    let scan_commits = if opts.limit.is_none() && opts.since.is_none() {
        snapshot.commits.clone()
    } else {
        log::read_commits(
            repo_root,
            &config.scan.git_binary,
            &LogOptions {
                limit: opts.limit,
                since: opts.since.clone(),
            },
        )?
    };

    let detector = OrphanDetector::new(&snapshot.report, config.correlate);
    let report = detector.detect(&scan_commits, &opts, &CancelFlag::new());

    render(output, &report, |report, w| render_orphans_human(report, w))
}

fn render_orphans_human(report: &OrphanReport, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "Orphan scan ({})", report.git_range)?;
    if report.cancelled {
        writeln!(w, "  CANCELLED - partial results below")?;
    }

    let stats = &report.stats;
    writeln!(w, "  commits examined:   {}", stats.total_commits)?;
    writeln!(w, "  already correlated: {}", stats.correlated_count)?;
    writeln!(
        w,
        "  orphans:            {} ({:.0}% of history)",
        stats.orphan_count,
        stats.orphan_ratio * 100.0
    )?;
    writeln!(
        w,
        "  flagged candidates: {} (avg suspicion {:.0})",
        stats.candidate_count, stats.avg_suspicion
    )?;

    if report.candidates.is_empty() {
        writeln!(w, "\nNo suspicious orphan commits.")?;
        return Ok(());
    }

    writeln!(w, "\nCandidates:")?;
    for candidate in &report.candidates {
        let summary = candidate.message.lines().next().unwrap_or_default();
        writeln!(
            w,
            "\n  {} {} - {} <{}>",
            candidate.short_sha,
            candidate.timestamp.format("%Y-%m-%d"),
            candidate.author,
            candidate.author_email,
        )?;
        writeln!(w, "    {summary}")?;
        writeln!(w, "    suspicion {}", candidate.suspicion_score)?;
        for probable in candidate.probable_beads.iter().take(3) {
            writeln!(
                w,
                "    -> {} ({}) confidence {} [{}]",
                probable.bead_id,
                probable.bead_title,
                probable.confidence,
                probable.reasons.join(", "),
            )?;
        }
    }

    if !report.by_bead.is_empty() {
        writeln!(w, "\nLikely missing links per bead:")?;
        for (bead_id, shas) in &report.by_bead {
            writeln!(w, "  {bead_id}: {} commit(s)", shas.len())?;
        }
    }

    Ok(())
}
