//! Correlated git history: the immutable snapshot the correlation engine
//! consumes.
//!
//! A [`HistoryReport`] is produced once per run by the history extractor and
//! is read-only downstream. `BTreeMap` containers keep every iteration order
//! deterministic, so index builds and scoring runs over the same snapshot
//! always produce the same output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One changed file within a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    pub insertions: u64,
    pub deletions: u64,
}

/// One commit as extracted from git history. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelatedCommit {
    pub sha: String,
    pub short_sha: String,
    pub author: String,
    pub author_email: String,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    #[serde(default)]
    pub files: Vec<FileChange>,
}

impl CorrelatedCommit {
    /// Total lines changed across all files in this commit.
    #[must_use]
    pub fn total_changes(&self) -> u64 {
        self.files
            .iter()
            .map(|f| f.insertions + f.deletions)
            .sum()
    }
}

/// A milestone event in a bead's lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeadEvent {
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
}

/// The milestones that bound a bead's active period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeadMilestones {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed: Option<BeadEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed: Option<BeadEvent>,
}

/// One bead's aggregated history view: ledger snapshot plus linked commits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeadHistory {
    pub title: String,
    pub status: crate::model::BeadStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_author: Option<String>,
    #[serde(default)]
    pub milestones: BeadMilestones,
    /// Commits linked to this bead, in `git log` order (newest first).
    #[serde(default)]
    pub commits: Vec<CorrelatedCommit>,
}

/// The authoritative correlation snapshot.
///
/// `histories` maps bead ID to that bead's aggregated view; `commit_index`
/// is the forward index from commit SHA to the bead IDs it is linked to.
/// The correlation engine never mutates this.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryReport {
    #[serde(default)]
    pub histories: BTreeMap<String, BeadHistory>,
    #[serde(default)]
    pub commit_index: BTreeMap<String, Vec<String>>,
}

impl HistoryReport {
    /// Returns `true` if the forward index links `sha` to at least one bead.
    #[must_use]
    pub fn is_correlated(&self, sha: &str) -> bool {
        self.commit_index.get(sha).is_some_and(|ids| !ids.is_empty())
    }

    /// Bead IDs linked to `sha`, empty when the commit is an orphan.
    #[must_use]
    pub fn linked_beads(&self, sha: &str) -> &[String] {
        self.commit_index.get(sha).map_or(&[], Vec::as_slice)
    }
}
