//! `tether hotspots` - files touched by the most distinct beads.

use std::io::Write;
use std::path::Path;

use clap::Args;
use serde::Serialize;
use tether_core::config::ProjectConfig;
use tether_correlate::{FileHotspot, FileLookup};

use crate::output::{OutputMode, render};
use crate::snapshot;

/// Arguments for `tether hotspots`.
#[derive(Args, Debug)]
pub struct HotspotsArgs {
    /// Show at most this many files (0 = all).
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

/// Report payload for `tether hotspots`.
#[derive(Debug, Serialize)]
pub struct HotspotsPayload {
    pub hotspots: Vec<FileHotspot>,
}

/// Execute `tether hotspots`.
pub fn run_hotspots(
    args: &HotspotsArgs,
    output: OutputMode,
    repo_root: &Path,
    config: &ProjectConfig,
    ledger_override: Option<&Path>,
) -> anyhow::Result<()> {
    let snapshot = snapshot::load_snapshot(output, repo_root, config, ledger_override)?;
    let lookup = FileLookup::new(&snapshot.report);
    let payload = HotspotsPayload {
        hotspots: lookup.hotspots(args.limit),
    };

    render(output, &payload, |payload, w| render_hotspots_human(payload, w))
}

fn render_hotspots_human(payload: &HotspotsPayload, w: &mut dyn Write) -> std::io::Result<()> {
    if payload.hotspots.is_empty() {
        writeln!(w, "No indexed files.")?;
        return Ok(());
    }

    writeln!(w, "Hotspots (files touched by the most beads):")?;
    for hotspot in &payload.hotspots {
        writeln!(
            w,
            "  {:>3} bead(s)  {}  ({} open / {} closed)",
            hotspot.total_beads, hotspot.file_path, hotspot.open_beads, hotspot.closed_beads,
        )?;
    }
    Ok(())
}
