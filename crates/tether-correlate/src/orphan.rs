//! Orphan-commit detection: multi-signal scoring of unlinked commits
//! against every known bead.
//!
//! # Overview
//!
//! Commits already present in the forward index are counted and skipped.
//! Every other commit is evaluated against every bead with four
//! independent signals:
//!
//! - **timing** - the commit timestamp falls inside the bead's active
//!   window.
//! - **files** - the commit's changed files intersect the files the bead
//!   has historically touched; weight scales with overlap size, capped.
//! - **message** - the commit message contains the bead title or one of
//!   its keywords, case-insensitively.
//! - **author** - the commit author has prior commits against the bead.
//!
//! Per-bead confidence is the sum of fired signal weights capped at 100.
//! A commit's suspicion score is its best per-bead confidence, and the
//! commit is reported as a candidate only when that clears the configured
//! threshold.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tether_core::config::CorrelateConfig;
use tether_core::history::{BeadHistory, CorrelatedCommit, HistoryReport};
use tether_core::model::BeadStatus;
use tracing::{debug, instrument};

use crate::file_index::{FileBeadIndex, build_file_index};
use crate::path::normalize_path;
use crate::report::{OrphanReport, OrphanReportStats, data_hash, format_range};
use crate::temporal::{TemporalWindow, author_associations, bead_windows};

/// Title words shorter than this never become keywords.
const MIN_KEYWORD_LEN: usize = 4;

/// Common words excluded from title-keyword matching.
const STOPWORDS: &[&str] = &[
    "about", "after", "been", "before", "being", "could", "from", "have", "into", "over",
    "should", "that", "them", "then", "they", "this", "when", "where", "which", "while",
    "will", "with", "would",
];

/// How many overlapping paths a files-signal detail names before eliding.
const FILES_DETAIL_LIMIT: usize = 3;

// ---------------------------------------------------------------------------
// Signal and candidate records
// ---------------------------------------------------------------------------

/// The four independent matching signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrphanSignal {
    Timing,
    Files,
    Message,
    Author,
}

impl OrphanSignal {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timing => "timing",
            Self::Files => "files",
            Self::Message => "message",
            Self::Author => "author",
        }
    }
}

/// A single signal's contribution to one bead's candidacy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanSignalHit {
    pub signal: OrphanSignal,
    pub details: String,
    pub weight: u32,
}

/// One bead's confidence-scored candidacy for a given commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbableBead {
    pub bead_id: String,
    pub bead_title: String,
    pub bead_status: BeadStatus,
    /// 0–100; the sum of fired signal weights, capped.
    pub confidence: u32,
    /// Names of the signals that fired, in signal-evaluation order.
    pub reasons: Vec<String>,
}

/// A commit flagged as insufficiently or not linked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrphanCandidate {
    pub sha: String,
    pub short_sha: String,
    pub message: String,
    pub author: String,
    pub author_email: String,
    pub timestamp: DateTime<Utc>,
    /// Normalized paths the commit changed.
    pub files: Vec<String>,
    /// Best per-bead confidence for this commit.
    pub suspicion_score: u32,
    /// Candidate beads, best first.
    pub probable_beads: Vec<ProbableBead>,
    /// Every signal hit across every evaluated bead, flattened.
    pub signals: Vec<OrphanSignalHit>,
}

// ---------------------------------------------------------------------------
// Options and cancellation
// ---------------------------------------------------------------------------

/// Options controlling a detection pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectOptions {
    /// Examine at most this many commits (`None` = unconstrained).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// git-style lower bound on commit age (e.g. `"2 weeks ago"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    /// Also score commits the forward index already correlates, to audit
    /// linkage consistency.
    #[serde(default)]
    pub rescore_correlated: bool,
    /// Per-run override for the configured suspicion threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_suspicion: Option<u32>,
}

/// Cooperative cancellation for long detection passes.
///
/// Checked between commits; a cancelled pass returns the partial report
/// with its `cancelled` flag set instead of silently truncating.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// OrphanDetector
// ---------------------------------------------------------------------------

/// Scores unlinked commits against every known bead.
///
/// Construction precomputes everything scoring needs from the immutable
/// report: the reverse file index, per-bead activity windows, the
/// author-to-beads association, per-bead touched-file sets, and per-bead
/// title keywords.
#[derive(Debug)]
pub struct OrphanDetector<'a> {
    report: &'a HistoryReport,
    config: CorrelateConfig,
    index: FileBeadIndex,
    windows: BTreeMap<String, TemporalWindow>,
    author_beads: BTreeMap<String, BTreeSet<String>>,
    bead_files: BTreeMap<String, BTreeSet<String>>,
    keywords: BTreeMap<String, Vec<String>>,
}

impl<'a> OrphanDetector<'a> {
    #[must_use]
    #[instrument(skip_all, fields(beads = report.histories.len()))]
    pub fn new(report: &'a HistoryReport, config: CorrelateConfig) -> Self {
        let index = build_file_index(Some(report));

        // Invert the index: per-bead touched-file sets for the files signal.
        let mut bead_files: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (file_path, refs) in &index.file_to_beads {
            for reference in refs {
                bead_files
                    .entry(reference.bead_id.clone())
                    .or_default()
                    .insert(file_path.clone());
            }
        }

        let keywords = report
            .histories
            .iter()
            .map(|(bead_id, history)| (bead_id.clone(), title_keywords(&history.title)))
            .collect();

        Self {
            report,
            config,
            index,
            windows: bead_windows(report),
            author_beads: author_associations(report),
            bead_files,
            keywords,
        }
    }

    /// Per-bead activity windows (exposed for diagnostics and tests).
    #[must_use]
    pub const fn windows(&self) -> &BTreeMap<String, TemporalWindow> {
        &self.windows
    }

    /// Author email → bead IDs (exposed for diagnostics and tests).
    #[must_use]
    pub const fn author_beads(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.author_beads
    }

    /// The reverse file index built for the files signal.
    #[must_use]
    pub const fn file_index(&self) -> &FileBeadIndex {
        &self.index
    }

    /// Score `commits` and aggregate the repository-wide orphan report.
    #[must_use]
    #[instrument(skip_all, fields(commits = commits.len()))]
    pub fn detect(
        &self,
        commits: &[CorrelatedCommit],
        opts: &DetectOptions,
        cancel: &CancelFlag,
    ) -> OrphanReport {
        let min_suspicion = opts.min_suspicion.unwrap_or(self.config.min_suspicion);

        let mut total_commits = 0;
        let mut correlated_count = 0;
        let mut orphan_count = 0;
        let mut cancelled = false;
        let mut candidates: Vec<OrphanCandidate> = Vec::new();

        for commit in commits {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            total_commits += 1;

            let linked = self.report.is_correlated(&commit.sha);
            if linked {
                correlated_count += 1;
                if !opts.rescore_correlated {
                    continue;
                }
            } else {
                orphan_count += 1;
            }

            let (probable_beads, signals) = self.score_commit(commit);
            if probable_beads.is_empty() {
                continue;
            }

            let suspicion_score = probable_beads[0].confidence;
            if suspicion_score < min_suspicion {
                continue;
            }

            debug!(
                sha = %commit.short_sha,
                suspicion = suspicion_score,
                top = %probable_beads[0].bead_id,
                "orphan candidate"
            );

            candidates.push(OrphanCandidate {
                sha: commit.sha.clone(),
                short_sha: commit.short_sha.clone(),
                message: commit.message.clone(),
                author: commit.author.clone(),
                author_email: commit.author_email.clone(),
                timestamp: commit.timestamp,
                files: commit.files.iter().map(|f| normalize_path(&f.path)).collect(),
                suspicion_score,
                probable_beads,
                signals,
            });
        }

        let candidate_count = candidates.len();
        #[allow(clippy::cast_precision_loss)]
        let orphan_ratio = if total_commits == 0 {
            0.0
        } else {
            orphan_count as f64 / total_commits as f64
        };
        #[allow(clippy::cast_precision_loss)]
        let avg_suspicion = if candidates.is_empty() {
            0.0
        } else {
            candidates.iter().map(|c| f64::from(c.suspicion_score)).sum::<f64>()
                / candidate_count as f64
        };

        // Attribute each candidate to its top-ranked probable bead only.
        let mut by_bead: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for candidate in &candidates {
            if let Some(top) = candidate.probable_beads.first() {
                by_bead
                    .entry(top.bead_id.clone())
                    .or_default()
                    .push(candidate.sha.clone());
            }
        }

        OrphanReport {
            generated_at: Utc::now(),
            git_range: format_range(opts),
            data_hash: data_hash(self.report, commits),
            cancelled,
            stats: OrphanReportStats {
                total_commits,
                correlated_count,
                orphan_count,
                candidate_count,
                orphan_ratio,
                avg_suspicion,
            },
            candidates,
            by_bead,
        }
    }

    /// Evaluate one commit against every known bead.
    ///
    /// Returns the probable beads sorted by confidence descending (stable:
    /// lexical bead-ID order on ties) and every signal hit, flattened.
    fn score_commit(&self, commit: &CorrelatedCommit) -> (Vec<ProbableBead>, Vec<OrphanSignalHit>) {
        let commit_files: BTreeSet<String> = commit
            .files
            .iter()
            .map(|f| normalize_path(&f.path))
            .filter(|p| !p.is_empty())
            .collect();
        let message_lc = commit.message.to_lowercase();

        let mut probable_beads = Vec::new();
        let mut all_signals = Vec::new();

        for (bead_id, history) in &self.report.histories {
            let hits = self.score_against(commit, &commit_files, &message_lc, bead_id, history);
            if hits.is_empty() {
                continue;
            }

            let confidence = hits.iter().map(|h| h.weight).sum::<u32>().min(100);
            let reasons = hits.iter().map(|h| h.signal.as_str().to_string()).collect();

            probable_beads.push(ProbableBead {
                bead_id: bead_id.clone(),
                bead_title: history.title.clone(),
                bead_status: history.status,
                confidence,
                reasons,
            });
            all_signals.extend(hits);
        }

        probable_beads.sort_by(|a, b| b.confidence.cmp(&a.confidence));
        (probable_beads, all_signals)
    }

    fn score_against(
        &self,
        commit: &CorrelatedCommit,
        commit_files: &BTreeSet<String>,
        message_lc: &str,
        bead_id: &str,
        history: &BeadHistory,
    ) -> Vec<OrphanSignalHit> {
        let mut hits = Vec::new();

        if let Some(window) = self.windows.get(bead_id)
            && window.contains(commit.timestamp)
        {
            hits.push(OrphanSignalHit {
                signal: OrphanSignal::Timing,
                details: format!(
                    "commit {} falls inside the {bead_id} active window ({})",
                    commit.short_sha,
                    window.describe()
                ),
                weight: self.config.timing_weight,
            });
        }

        if let Some(touched) = self.bead_files.get(bead_id) {
            let overlap: Vec<&String> = commit_files.intersection(touched).collect();
            if !overlap.is_empty() {
                #[allow(clippy::cast_possible_truncation)]
                let count = overlap.len() as u32;
                let weight =
                    (self.config.files_weight_per_file * count).min(self.config.files_weight_cap);
                hits.push(OrphanSignalHit {
                    signal: OrphanSignal::Files,
                    details: files_detail(bead_id, &overlap),
                    weight,
                });
            }
        }

        if let Some(fragment) = message_match(message_lc, &history.title, self.keywords.get(bead_id))
        {
            hits.push(OrphanSignalHit {
                signal: OrphanSignal::Message,
                details: format!("message mentions \"{fragment}\""),
                weight: self.config.message_weight,
            });
        }

        if self
            .author_beads
            .get(&commit.author_email)
            .is_some_and(|beads| beads.contains(bead_id))
        {
            hits.push(OrphanSignalHit {
                signal: OrphanSignal::Author,
                details: format!(
                    "author {} has prior commits on {bead_id}",
                    commit.author_email
                ),
                weight: self.config.author_weight,
            });
        }

        hits
    }
}

// ---------------------------------------------------------------------------
// Signal helpers
// ---------------------------------------------------------------------------

/// Keywords from a bead title: lowercase words of at least
/// [`MIN_KEYWORD_LEN`] characters, stopwords removed, first-seen order.
fn title_keywords(title: &str) -> Vec<String> {
    let mut keywords = Vec::new();
    for word in title
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() >= MIN_KEYWORD_LEN)
        .filter(|w| !STOPWORDS.contains(w))
    {
        if !keywords.iter().any(|k| k == word) {
            keywords.push(word.to_string());
        }
    }
    keywords
}

/// The matched fragment when a lowercased message mentions a bead title or
/// one of its keywords; `None` when nothing matches.
fn message_match(
    message_lc: &str,
    title: &str,
    keywords: Option<&Vec<String>>,
) -> Option<String> {
    let title_lc = title.to_lowercase();
    if !title_lc.is_empty() && message_lc.contains(&title_lc) {
        return Some(title_lc);
    }

    keywords?
        .iter()
        .find(|keyword| message_lc.contains(keyword.as_str()))
        .cloned()
}

fn files_detail(bead_id: &str, overlap: &[&String]) -> String {
    let shown: Vec<&str> = overlap
        .iter()
        .take(FILES_DETAIL_LIMIT)
        .map(|s| s.as_str())
        .collect();
    let suffix = if overlap.len() > FILES_DETAIL_LIMIT {
        format!(" (+{} more)", overlap.len() - FILES_DETAIL_LIMIT)
    } else {
        String::new()
    };
    format!(
        "touches {} file(s) shared with {bead_id}: {}{suffix}",
        overlap.len(),
        shown.join(", ")
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tether_core::history::{BeadEvent, BeadMilestones, FileChange};

    fn ts(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, day, hour, 0, 0).single().expect("valid ts")
    }

    fn linked_commit() -> CorrelatedCommit {
        CorrelatedCommit {
            sha: "1".repeat(40),
            short_sha: "1111111".to_string(),
            author: "Ana Dev".to_string(),
            author_email: "ana@example.com".to_string(),
            timestamp: ts(2, 12),
            message: "bd-feed: rework feed pagination".to_string(),
            files: vec![FileChange {
                path: "src/feed.rs".to_string(),
                insertions: 40,
                deletions: 8,
            }],
        }
    }

    fn report() -> HistoryReport {
        let mut report = HistoryReport::default();
        report.histories.insert(
            "bd-feed".to_string(),
            BeadHistory {
                title: "Rework feed pagination".to_string(),
                status: BeadStatus::InProgress,
                last_author: Some("Ana Dev".to_string()),
                milestones: BeadMilestones {
                    claimed: Some(BeadEvent {
                        timestamp: ts(1, 0),
                        actor: None,
                    }),
                    closed: None,
                },
                commits: vec![linked_commit()],
            },
        );
        report
            .commit_index
            .insert(linked_commit().sha, vec!["bd-feed".to_string()]);
        report
    }

    fn unlinked(message: &str, email: &str, day: u32, paths: &[&str]) -> CorrelatedCommit {
        CorrelatedCommit {
            sha: "2".repeat(40),
            short_sha: "2222222".to_string(),
            author: "Ana Dev".to_string(),
            author_email: email.to_string(),
            timestamp: ts(day, 6),
            message: message.to_string(),
            files: paths
                .iter()
                .map(|p| FileChange {
                    path: (*p).to_string(),
                    insertions: 2,
                    deletions: 1,
                })
                .collect(),
        }
    }

    #[test]
    fn correlated_commits_are_skipped_not_scored() {
        let report = report();
        let detector = OrphanDetector::new(&report, CorrelateConfig::default());

        let out = detector.detect(&[linked_commit()], &DetectOptions::default(), &CancelFlag::new());
        assert_eq!(out.stats.total_commits, 1);
        assert_eq!(out.stats.correlated_count, 1);
        assert_eq!(out.stats.orphan_count, 0);
        assert!(out.candidates.is_empty());
    }

    #[test]
    fn all_four_signals_fire_for_a_matching_orphan() {
        let report = report();
        let detector = OrphanDetector::new(&report, CorrelateConfig::default());

        let commit = unlinked(
            "fix pagination cursor bug",
            "ana@example.com",
            3,
            &["src/feed.rs"],
        );
        let out = detector.detect(&[commit], &DetectOptions::default(), &CancelFlag::new());

        assert_eq!(out.stats.orphan_count, 1);
        assert_eq!(out.candidates.len(), 1);

        let candidate = &out.candidates[0];
        // timing 30 + files 10 (one file) + message 20 + author 20
        assert_eq!(candidate.suspicion_score, 80);
        assert_eq!(candidate.probable_beads[0].bead_id, "bd-feed");
        assert_eq!(
            candidate.probable_beads[0].reasons,
            ["timing", "files", "message", "author"]
        );
        assert_eq!(candidate.signals.len(), 4);
    }

    #[test]
    fn weak_evidence_stays_below_the_threshold() {
        let report = report();
        let detector = OrphanDetector::new(&report, CorrelateConfig::default());

        // Timing only (30 < 40): unknown author, unrelated message and files.
        let commit = unlinked("tidy readme", "someone@else.com", 3, &["README.md"]);
        let out = detector.detect(&[commit], &DetectOptions::default(), &CancelFlag::new());

        assert_eq!(out.stats.orphan_count, 1);
        assert!(out.candidates.is_empty(), "timing alone must not flag");
    }

    #[test]
    fn threshold_override_travels_in_options() {
        let report = report();
        let detector = OrphanDetector::new(&report, CorrelateConfig::default());

        let commit = unlinked("tidy readme", "someone@else.com", 3, &["README.md"]);
        let opts = DetectOptions {
            min_suspicion: Some(10),
            ..DetectOptions::default()
        };
        let out = detector.detect(&[commit], &opts, &CancelFlag::new());
        assert_eq!(out.candidates.len(), 1, "lowered threshold admits timing-only");
    }

    #[test]
    fn commits_outside_the_window_skip_the_timing_signal() {
        let report = report();
        let detector = OrphanDetector::new(&report, CorrelateConfig::default());

        let mut commit = unlinked("fix pagination", "ana@example.com", 3, &["src/feed.rs"]);
        commit.timestamp = Utc
            .with_ymd_and_hms(2026, 3, 20, 0, 0, 0)
            .single()
            .expect("valid ts");
        let out = detector.detect(&[commit], &DetectOptions::default(), &CancelFlag::new());

        let candidate = &out.candidates[0];
        assert_eq!(
            candidate.probable_beads[0].reasons,
            ["files", "message", "author"]
        );
        assert_eq!(candidate.suspicion_score, 50);
    }

    #[test]
    fn file_overlap_weight_scales_and_caps() {
        let mut report = report();
        let history = report.histories.get_mut("bd-feed").expect("bead exists");
        history.commits[0].files = (0..5)
            .map(|i| FileChange {
                path: format!("src/feed/part{i}.rs"),
                insertions: 1,
                deletions: 0,
            })
            .collect();

        let detector = OrphanDetector::new(&report, CorrelateConfig::default());
        let commit = unlinked(
            "tidy",
            "nobody@else.com",
            3,
            &[
                "src/feed/part0.rs",
                "src/feed/part1.rs",
                "src/feed/part2.rs",
                "src/feed/part3.rs",
            ],
        );

        let (probables, signals) = detector.score_commit(&commit);
        let files_hit = signals
            .iter()
            .find(|h| h.signal == OrphanSignal::Files)
            .expect("files signal fires");
        // 4 overlapping files at 10 each caps at 30.
        assert_eq!(files_hit.weight, 30);
        assert!(files_hit.details.contains("4 file(s)"));
        assert!(files_hit.details.contains("+1 more"), "detail truncates at three paths");
        assert!(!probables.is_empty());
    }

    #[test]
    fn probable_beads_rank_by_confidence_with_stable_ties() {
        let mut report = report();
        // Second bead with identical evidence shape: same-window claim.
        report.histories.insert(
            "bd-alpha".to_string(),
            BeadHistory {
                title: "Different thing".to_string(),
                status: BeadStatus::Open,
                last_author: None,
                milestones: BeadMilestones {
                    claimed: Some(BeadEvent {
                        timestamp: ts(1, 0),
                        actor: None,
                    }),
                    closed: None,
                },
                commits: vec![],
            },
        );

        let detector = OrphanDetector::new(&report, CorrelateConfig::default());
        // Timing fires for both beads, nothing else: a 30/30 tie broken by
        // lexical bead-ID order.
        let commit = unlinked("tidy", "nobody@else.com", 3, &[]);
        let (probables, _) = detector.score_commit(&commit);

        assert_eq!(probables.len(), 2);
        assert_eq!(probables[0].bead_id, "bd-alpha");
        assert_eq!(probables[1].bead_id, "bd-feed");
        assert_eq!(probables[0].confidence, probables[1].confidence);
    }

    #[test]
    fn by_bead_attributes_top_ranked_only() {
        let report = report();
        let detector = OrphanDetector::new(&report, CorrelateConfig::default());

        let commit = unlinked("fix pagination", "ana@example.com", 3, &["src/feed.rs"]);
        let sha = commit.sha.clone();
        let out = detector.detect(&[commit], &DetectOptions::default(), &CancelFlag::new());

        assert_eq!(out.by_bead.len(), 1);
        assert_eq!(out.by_bead.get("bd-feed").expect("bucket exists"), &vec![sha]);
    }

    #[test]
    fn stats_ratio_guards_zero_and_averages_candidates_only() {
        let report = report();
        let detector = OrphanDetector::new(&report, CorrelateConfig::default());

        let empty = detector.detect(&[], &DetectOptions::default(), &CancelFlag::new());
        assert_eq!(empty.stats.total_commits, 0);
        assert!((empty.stats.orphan_ratio - 0.0).abs() < f64::EPSILON);
        assert!((empty.stats.avg_suspicion - 0.0).abs() < f64::EPSILON);

        let commits = vec![
            linked_commit(),
            unlinked("fix pagination", "ana@example.com", 3, &["src/feed.rs"]),
            unlinked("tidy readme", "someone@else.com", 3, &["README.md"]),
        ];
        let out = detector.detect(&commits, &DetectOptions::default(), &CancelFlag::new());
        assert_eq!(out.stats.total_commits, 3);
        assert_eq!(out.stats.correlated_count, 1);
        assert_eq!(out.stats.orphan_count, 2);
        assert_eq!(out.stats.candidate_count, 1);
        assert!((out.stats.orphan_ratio - 2.0 / 3.0).abs() < 1e-12);
        assert!((out.stats.avg_suspicion - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn cancellation_returns_partial_report_with_flag() {
        let report = report();
        let detector = OrphanDetector::new(&report, CorrelateConfig::default());

        let cancel = CancelFlag::new();
        cancel.cancel();
        let commits = vec![unlinked("fix pagination", "ana@example.com", 3, &["src/feed.rs"])];
        let out = detector.detect(&commits, &DetectOptions::default(), &cancel);

        assert!(out.cancelled);
        assert_eq!(out.stats.total_commits, 0, "cancelled before the first commit");
        assert!(out.candidates.is_empty());
    }

    #[test]
    fn rescore_correlated_audits_linked_commits() {
        let report = report();
        let detector = OrphanDetector::new(&report, CorrelateConfig::default());

        let opts = DetectOptions {
            rescore_correlated: true,
            ..DetectOptions::default()
        };
        let out = detector.detect(&[linked_commit()], &opts, &CancelFlag::new());
        assert_eq!(out.stats.correlated_count, 1);
        assert_eq!(out.stats.orphan_count, 0);
        // The linked commit scores maximally against its own bead.
        assert_eq!(out.candidates.len(), 1);
        assert_eq!(out.candidates[0].probable_beads[0].bead_id, "bd-feed");
    }

    #[test]
    fn confidence_caps_at_one_hundred() {
        let report = report();
        let config = CorrelateConfig {
            timing_weight: 90,
            author_weight: 90,
            ..CorrelateConfig::default()
        };
        let detector = OrphanDetector::new(&report, config);

        let commit = unlinked("tidy", "ana@example.com", 3, &[]);
        let (probables, _) = detector.score_commit(&commit);
        assert_eq!(probables[0].confidence, 100);
    }

    #[test]
    fn title_keywords_filter_short_words_and_stopwords() {
        let words = title_keywords("Fix the auth token refresh with care");
        assert_eq!(words, ["auth", "token", "refresh", "care"]);
    }

    #[test]
    fn message_match_prefers_full_title() {
        let fragment = message_match(
            "revert rework feed pagination for now",
            "Rework feed pagination",
            Some(&vec!["rework".to_string(), "feed".to_string()]),
        )
        .expect("matches");
        assert_eq!(fragment, "rework feed pagination");
    }

    #[test]
    fn signal_serde_names_are_stable() {
        let names: Vec<String> = [
            OrphanSignal::Timing,
            OrphanSignal::Files,
            OrphanSignal::Message,
            OrphanSignal::Author,
        ]
        .iter()
        .map(|s| serde_json::to_string(s).expect("serialize"))
        .collect();
        assert_eq!(names, ["\"timing\"", "\"files\"", "\"message\"", "\"author\""]);
    }
}
