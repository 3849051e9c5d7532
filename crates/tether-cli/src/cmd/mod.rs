//! One module per CLI subcommand.

pub mod completions;
pub mod files;
pub mod glob;
pub mod hotspots;
pub mod orphans;
pub mod stats;

use std::io::{self, Write};

use tether_correlate::FileBeadLookupResult;

/// Shared human rendering for file/glob lookup results.
pub(crate) fn render_lookup_human(
    result: &FileBeadLookupResult,
    w: &mut dyn Write,
) -> io::Result<()> {
    writeln!(w, "{}", result.file_path)?;
    if result.total_beads == 0 {
        writeln!(w, "  no beads have touched this path")?;
        return Ok(());
    }

    if !result.open_beads.is_empty() {
        writeln!(w, "\nOpen beads ({}):", result.open_beads.len())?;
        for bead in &result.open_beads {
            writeln!(
                w,
                "  {} [{}] {} - {} commit(s), last touch {}",
                bead.bead_id,
                bead.status,
                bead.title,
                bead.commit_shas.len(),
                bead.last_touch.format("%Y-%m-%d"),
            )?;
        }
    }

    if !result.closed_beads.is_empty() {
        writeln!(w, "\nClosed beads ({}):", result.closed_beads.len())?;
        for bead in &result.closed_beads {
            writeln!(
                w,
                "  {} {} - {} commit(s), last touch {}",
                bead.bead_id,
                bead.title,
                bead.commit_shas.len(),
                bead.last_touch.format("%Y-%m-%d"),
            )?;
        }
    }

    writeln!(w, "\nTotal: {} bead(s)", result.total_beads)
}
