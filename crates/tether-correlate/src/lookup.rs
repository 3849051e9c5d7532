//! File-to-bead lookups over a built index, with live status refresh.
//!
//! # Overview
//!
//! [`FileLookup`] wraps a [`FileBeadIndex`] plus the live bead-history map.
//! Index entries carry status/title snapshots from build time; every
//! reference returned by a lookup is refreshed from the live map first, so
//! callers never see a stale status. This keeps the index itself immutable
//! and independently cacheable while the ledger moves on.
//!
//! Lookups bucket references into "open" (anything not `closed`) and
//! "closed". Directory and glob lookups de-duplicate beads across the
//! multiple files they matched.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tether_core::history::{BeadHistory, HistoryReport};

use crate::file_index::{BeadReference, FileBeadIndex, FileIndexStats, build_file_index};
use crate::path::normalize_path;

// ---------------------------------------------------------------------------
// Result records
// ---------------------------------------------------------------------------

/// Result of looking up the beads for a file, directory, or pattern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileBeadLookupResult {
    /// The path or pattern as the caller supplied it.
    pub file_path: String,
    pub open_beads: Vec<BeadReference>,
    pub closed_beads: Vec<BeadReference>,
    pub total_beads: usize,
}

/// A file touched by many distinct beads, a proxy for contention-prone code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHotspot {
    pub file_path: String,
    pub total_beads: usize,
    pub open_beads: usize,
    pub closed_beads: usize,
}

/// A glob pattern that failed to compile.
///
/// Reported to the caller instead of being silently swallowed; the caller
/// decides whether to surface or skip it.
#[derive(Debug, thiserror::Error)]
#[error("invalid glob pattern {pattern:?}: {source}")]
pub struct GlobPatternError {
    pub pattern: String,
    #[source]
    pub source: glob::PatternError,
}

// ---------------------------------------------------------------------------
// FileLookup
// ---------------------------------------------------------------------------

/// File-to-bead query surface over one history snapshot.
#[derive(Debug)]
pub struct FileLookup<'a> {
    index: FileBeadIndex,
    beads: &'a BTreeMap<String, BeadHistory>,
}

impl<'a> FileLookup<'a> {
    /// Build the index from `report` and wrap it with the live bead map.
    #[must_use]
    pub fn new(report: &'a HistoryReport) -> Self {
        Self {
            index: build_file_index(Some(report)),
            beads: &report.histories,
        }
    }

    /// Wrap an already-built index (e.g. a cached one) with a live bead map.
    #[must_use]
    pub const fn from_parts(index: FileBeadIndex, beads: &'a BTreeMap<String, BeadHistory>) -> Self {
        Self { index, beads }
    }

    /// The underlying immutable index.
    #[must_use]
    pub const fn index(&self) -> &FileBeadIndex {
        &self.index
    }

    /// Aggregate statistics about the index.
    #[must_use]
    pub const fn stats(&self) -> &FileIndexStats {
        &self.index.stats
    }

    /// All indexed paths in lexical order.
    #[must_use]
    pub fn all_files(&self) -> Vec<String> {
        self.index.file_to_beads.keys().cloned().collect()
    }

    /// Find all beads that have touched `path`.
    ///
    /// Tries an exact match on the normalized path first; on a miss, `path`
    /// is treated as a directory and every indexed path under `path + "/"`
    /// contributes, with beads de-duplicated across files. (Backslash paths
    /// are covered by normalization, which collapses them before matching.)
    #[must_use]
    pub fn lookup_by_file(&self, path: &str) -> FileBeadLookupResult {
        let normalized = normalize_path(path);

        let mut result = FileBeadLookupResult {
            file_path: path.to_string(),
            ..FileBeadLookupResult::default()
        };

        if let Some(refs) = self.index.references(&normalized) {
            for reference in refs {
                let refreshed = self.refreshed(reference);
                if refreshed.status.is_closed() {
                    result.closed_beads.push(refreshed);
                } else {
                    result.open_beads.push(refreshed);
                }
            }
            result.total_beads = refs.len();
            return result;
        }

        // Directory fallback.
        let prefix = format!("{normalized}/");
        let mut seen = BTreeSet::new();
        for (file_path, refs) in &self.index.file_to_beads {
            if !file_path.starts_with(&prefix) {
                continue;
            }
            for reference in refs {
                if !seen.insert(reference.bead_id.clone()) {
                    continue;
                }
                let refreshed = self.refreshed(reference);
                if refreshed.status.is_closed() {
                    result.closed_beads.push(refreshed);
                } else {
                    result.open_beads.push(refreshed);
                }
            }
        }

        result.total_beads = result.open_beads.len() + result.closed_beads.len();
        result
    }

    /// Find beads for files matching a glob pattern.
    ///
    /// Beads are de-duplicated across all matching files.
    ///
    /// # Errors
    ///
    /// Returns [`GlobPatternError`] when the pattern fails to compile; no
    /// partial result is produced for a malformed pattern.
    pub fn lookup_by_glob(&self, pattern: &str) -> Result<FileBeadLookupResult, GlobPatternError> {
        let compiled = glob::Pattern::new(pattern).map_err(|source| GlobPatternError {
            pattern: pattern.to_string(),
            source,
        })?;

        let mut result = FileBeadLookupResult {
            file_path: pattern.to_string(),
            ..FileBeadLookupResult::default()
        };

        let mut seen = BTreeSet::new();
        for (file_path, refs) in &self.index.file_to_beads {
            if !compiled.matches(file_path) {
                continue;
            }
            for reference in refs {
                if !seen.insert(reference.bead_id.clone()) {
                    continue;
                }
                let refreshed = self.refreshed(reference);
                if refreshed.status.is_closed() {
                    result.closed_beads.push(refreshed);
                } else {
                    result.open_beads.push(refreshed);
                }
            }
        }

        result.total_beads = result.open_beads.len() + result.closed_beads.len();
        Ok(result)
    }

    /// Files touched by the most beads, best first.
    ///
    /// `limit == 0` (or a limit beyond the file count) returns every file.
    /// Ties order by path ascending so rankings are deterministic.
    #[must_use]
    pub fn hotspots(&self, limit: usize) -> Vec<FileHotspot> {
        let mut counts: Vec<(&String, &Vec<BeadReference>)> =
            self.index.file_to_beads.iter().collect();

        counts.sort_by(|(path_a, refs_a), (path_b, refs_b)| {
            refs_b.len().cmp(&refs_a.len()).then_with(|| path_a.cmp(path_b))
        });

        let take = if limit == 0 || limit > counts.len() {
            counts.len()
        } else {
            limit
        };

        counts
            .into_iter()
            .take(take)
            .map(|(path, refs)| {
                let open = refs
                    .iter()
                    .filter(|r| !self.refreshed_status(r).is_closed())
                    .count();
                FileHotspot {
                    file_path: path.clone(),
                    total_beads: refs.len(),
                    open_beads: open,
                    closed_beads: refs.len() - open,
                }
            })
            .collect()
    }

    /// Clone `reference` with status/title refreshed from the live bead map.
    fn refreshed(&self, reference: &BeadReference) -> BeadReference {
        let mut refreshed = reference.clone();
        if let Some(history) = self.beads.get(&reference.bead_id) {
            refreshed.status = history.status;
            refreshed.title = history.title.clone();
        }
        refreshed
    }

    fn refreshed_status(&self, reference: &BeadReference) -> tether_core::model::BeadStatus {
        self.beads
            .get(&reference.bead_id)
            .map_or(reference.status, |history| history.status)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
