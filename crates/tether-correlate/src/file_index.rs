//! Reverse index from file paths to the beads that touched them.
//!
//! # Overview
//!
//! For every bead in the history report, every linked commit's changed
//! files are folded into one [`BeadReference`] per `(path, bead)` pair:
//! the commit SHA list grows with order-preserving dedup, the last-touch
//! timestamp advances to the most recent commit, and changed-line counts
//! accumulate. Each file's reference list is then sorted most-recently-
//! active first.
//!
//! The index is a pure function of the report snapshot. Histories and the
//! per-file maps are `BTreeMap`s, so accumulation order (and therefore the
//! tie-break order of the stable sort) is deterministic: lexical bead-ID
//! order within a file, lexical path order across files.
//!
//! Statistics are derived from the finished map, never mutated separately.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tether_core::history::HistoryReport;
use tether_core::model::BeadStatus;
use tracing::instrument;

use crate::path::{append_unique, normalize_path};

// ---------------------------------------------------------------------------
// Index records
// ---------------------------------------------------------------------------

/// Links one bead to one file via the commits that touched it.
///
/// `title` and `status` are snapshots taken at index-build time; a bead's
/// status can change after the index was built, so [`crate::lookup::FileLookup`]
/// refreshes both from the live bead map before returning references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeadReference {
    pub bead_id: String,
    pub title: String,
    pub status: BeadStatus,
    /// Short SHAs of the commits linking this bead to this file, in first-seen order.
    pub commit_shas: Vec<String>,
    /// Most recent commit timestamp among those commits.
    pub last_touch: DateTime<Utc>,
    /// Insertions + deletions accumulated across those commits.
    pub total_changes: u64,
}

/// Aggregate statistics about the file index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileIndexStats {
    /// Number of distinct indexed files.
    pub total_files: usize,
    /// Sum of all per-file bead references.
    pub total_bead_links: usize,
    /// Files touched by more than one bead.
    pub files_with_multiple_beads: usize,
}

/// Lookup table from normalized file path to the beads that modified it.
///
/// Built once per [`HistoryReport`] snapshot; immutable after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileBeadIndex {
    /// Normalized file path → references, most recently touched bead first.
    pub file_to_beads: BTreeMap<String, Vec<BeadReference>>,
    pub stats: FileIndexStats,
}

impl FileBeadIndex {
    /// Returns `true` if no files are indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.file_to_beads.is_empty()
    }

    /// References for an already-normalized path.
    #[must_use]
    pub fn references(&self, normalized_path: &str) -> Option<&[BeadReference]> {
        self.file_to_beads.get(normalized_path).map(Vec::as_slice)
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Build a [`FileBeadIndex`] from a history report.
///
/// `None` (no report available) yields an empty index with zeroed
/// statistics rather than an error.
#[must_use]
#[instrument(skip(report))]
pub fn build_file_index(report: Option<&HistoryReport>) -> FileBeadIndex {
    let Some(report) = report else {
        return FileBeadIndex::default();
    };

    // file → bead → reference, confined to this function; only the finished
    // immutable index is exposed.
    let mut file_bead_map: BTreeMap<String, BTreeMap<String, BeadReference>> = BTreeMap::new();

    for (bead_id, history) in &report.histories {
        for commit in &history.commits {
            for file in &commit.files {
                let normalized = normalize_path(&file.path);
                if normalized.is_empty() {
                    continue;
                }

                let refs = file_bead_map.entry(normalized).or_default();
                let reference = refs.entry(bead_id.clone()).or_insert_with(|| BeadReference {
                    bead_id: bead_id.clone(),
                    title: history.title.clone(),
                    status: history.status,
                    commit_shas: Vec::new(),
                    last_touch: commit.timestamp,
                    total_changes: 0,
                });

                append_unique(&mut reference.commit_shas, &commit.short_sha);

                if commit.timestamp > reference.last_touch {
                    reference.last_touch = commit.timestamp;
                }

                reference.total_changes += file.insertions + file.deletions;
            }
        }
    }

    let mut index = FileBeadIndex::default();
    let mut total_links = 0;
    let mut multiple_beads = 0;

    for (file_path, bead_map) in file_bead_map {
        let mut refs: Vec<BeadReference> = bead_map.into_values().collect();

        // Most recently active bead first; stable, so equal timestamps keep
        // accumulation (lexical bead-ID) order.
        refs.sort_by(|a, b| b.last_touch.cmp(&a.last_touch));

        total_links += refs.len();
        if refs.len() > 1 {
            multiple_beads += 1;
        }
        index.file_to_beads.insert(file_path, refs);
    }

    index.stats = FileIndexStats {
        total_files: index.file_to_beads.len(),
        total_bead_links: total_links,
        files_with_multiple_beads: multiple_beads,
    };

    index
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
