//! The orphan report artifact: aggregate statistics, the examined-range
//! description, and the content fingerprint callers use to detect that a
//! cached report has gone stale.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tether_core::history::{CorrelatedCommit, HistoryReport};

use crate::orphan::{DetectOptions, OrphanCandidate};

/// Aggregate counters for one detection pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OrphanReportStats {
    pub total_commits: usize,
    /// Commits already linked via the forward index.
    pub correlated_count: usize,
    /// Commits with zero linkage.
    pub orphan_count: usize,
    /// Orphans that cleared the suspicion threshold.
    pub candidate_count: usize,
    /// `orphan_count / total_commits`, 0 when no commits were examined.
    pub orphan_ratio: f64,
    /// Mean suspicion score across candidates only.
    pub avg_suspicion: f64,
}

/// Output artifact of [`crate::orphan::OrphanDetector::detect`].
///
/// Serializable with stable field names so callers can cache it keyed by
/// `data_hash` and reload it across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrphanReport {
    pub generated_at: DateTime<Utc>,
    /// Human-readable description of the examined commit range.
    pub git_range: String,
    /// Content fingerprint of the underlying data; not a security hash.
    pub data_hash: String,
    /// Set when the pass was cancelled and the report is partial.
    #[serde(default)]
    pub cancelled: bool,
    pub stats: OrphanReportStats,
    pub candidates: Vec<OrphanCandidate>,
    /// Bead ID → SHAs of the candidates whose top-ranked match it is.
    pub by_bead: BTreeMap<String, Vec<String>>,
}

/// Describe the commit range a detection pass examined.
///
/// No constraints → `"all history"`; a positive limit → `"limit N"`; a
/// since bound renders its own phrase and composes with the limit.
#[must_use]
pub fn format_range(opts: &DetectOptions) -> String {
    match (&opts.since, opts.limit) {
        (None, None) => "all history".to_string(),
        (None, Some(limit)) => format!("limit {limit}"),
        (Some(since), None) => format!("since {since}"),
        (Some(since), Some(limit)) => format!("since {since}, limit {limit}"),
    }
}

/// Fingerprint the inputs of a detection pass.
///
/// Covers every bead's ID, status, and linked commit SHAs plus the scanned
/// commit SHAs, so any change to either side produces a different hash.
/// Used purely for cache invalidation.
#[must_use]
pub fn data_hash(report: &HistoryReport, commits: &[CorrelatedCommit]) -> String {
    let mut hasher = blake3::Hasher::new();

    for (bead_id, history) in &report.histories {
        hasher.update(bead_id.as_bytes());
        hasher.update(b"\x00");
        hasher.update(history.status.as_str().as_bytes());
        hasher.update(b"\x00");
        for commit in &history.commits {
            hasher.update(commit.sha.as_bytes());
            hasher.update(b"\x00");
        }
        hasher.update(b"\x01");
    }

    for commit in commits {
        hasher.update(commit.sha.as_bytes());
        hasher.update(b"\x00");
    }

    format!("blake3:{}", hasher.finalize())
}
