//! Bead ledger reader: `.beads/beads.jsonl`, one JSON bead per line.

use std::path::Path;

use anyhow::{Context, Result};
use tether_core::model::Bead;
use tracing::debug;

/// Load every bead from a JSONL ledger file.
///
/// Blank lines are skipped; any other malformed line is an error that names
/// the offending line number.
///
/// # Errors
///
/// Returns an error when the file is missing, unreadable, or contains a
/// line that does not parse as a bead object.
pub fn load_beads(path: &Path) -> Result<Vec<Bead>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read bead ledger {}", path.display()))?;

    let mut beads = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let bead: Bead = serde_json::from_str(line).with_context(|| {
            format!("Failed to parse {} line {}", path.display(), index + 1)
        })?;
        beads.push(bead);
    }

    debug!(count = beads.len(), ledger = %path.display(), "loaded bead ledger");
    Ok(beads)
}
