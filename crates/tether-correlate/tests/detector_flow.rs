//! End-to-end detector flow over a hand-built history fixture: one closed
//! bead with a linked commit, plus an unlinked commit that should hit all
//! four signals and rank that bead as its top match.

use chrono::{Duration, Utc};
use tether_core::config::CorrelateConfig;
use tether_core::history::{
    BeadEvent, BeadHistory, BeadMilestones, CorrelatedCommit, FileChange, HistoryReport,
};
use tether_core::model::BeadStatus;
use tether_correlate::{CancelFlag, DetectOptions, FileLookup, OrphanDetector, data_hash};

const BEAD: &str = "bd-auth1";
const AUTHOR_EMAIL: &str = "test@example.com";

fn commit(
    sha_char: char,
    hours_ago: i64,
    email: &str,
    message: &str,
    paths: &[&str],
) -> CorrelatedCommit {
    let sha: String = std::iter::repeat_n(sha_char, 40).collect();
    CorrelatedCommit {
        short_sha: sha.chars().take(7).collect(),
        sha,
        author: "Test Author".to_string(),
        author_email: email.to_string(),
        timestamp: Utc::now() - Duration::hours(hours_ago),
        message: message.to_string(),
        files: paths
            .iter()
            .map(|p| FileChange {
                path: (*p).to_string(),
                insertions: 12,
                deletions: 4,
            })
            .collect(),
    }
}

/// One closed bead claimed 72h ago, closed 24h ago, with a linked commit at
/// 48h touching the auth sources.
fn fixture() -> HistoryReport {
    let now = Utc::now();
    let linked = commit(
        'a',
        48,
        AUTHOR_EMAIL,
        "bd-auth1: harden token refresh",
        &["src/auth/token.rs", "src/auth/session.rs"],
    );

    let mut report = HistoryReport::default();
    report.commit_index.insert(linked.sha.clone(), vec![BEAD.to_string()]);
    report.histories.insert(
        BEAD.to_string(),
        BeadHistory {
            title: "Harden token refresh".to_string(),
            status: BeadStatus::Closed,
            last_author: Some("Test Author".to_string()),
            milestones: BeadMilestones {
                claimed: Some(BeadEvent {
                    timestamp: now - Duration::hours(72),
                    actor: Some("Test Author".to_string()),
                }),
                closed: Some(BeadEvent {
                    timestamp: now - Duration::hours(24),
                    actor: None,
                }),
            },
            commits: vec![linked],
        },
    );
    report
}

#[test]
fn construction_builds_window_and_author_model() {
    let report = fixture();
    let detector = OrphanDetector::new(&report, CorrelateConfig::default());

    let window = detector.windows().get(BEAD).expect("closed bead has a window");
    assert!(window.end.is_some(), "closed bead window is bounded above");

    let linked_ts = report.histories[BEAD].commits[0].timestamp;
    assert!(window.contains(linked_ts), "linked commit sits inside the window");

    let beads = detector
        .author_beads()
        .get(AUTHOR_EMAIL)
        .expect("author is associated");
    assert_eq!(beads.len(), 1);
    assert!(beads.contains(BEAD));
}

#[test]
fn unlinked_commit_hits_all_four_signals_and_ranks_the_bead_top() {
    let report = fixture();
    let detector = OrphanDetector::new(&report, CorrelateConfig::default());

    // 50h ago: inside [72h, 24h]; same author, same file, title keyword.
    let orphan = commit(
        'b',
        50,
        AUTHOR_EMAIL,
        "fix token refresh retry loop",
        &["src/auth/token.rs"],
    );
    let commits = vec![report.histories[BEAD].commits[0].clone(), orphan.clone()];

    let out = detector.detect(&commits, &DetectOptions::default(), &CancelFlag::new());

    assert_eq!(out.stats.total_commits, 2);
    assert_eq!(out.stats.correlated_count, 1);
    assert_eq!(out.stats.orphan_count, 1);
    assert_eq!(out.stats.candidate_count, 1);
    assert!((out.stats.orphan_ratio - 0.5).abs() < f64::EPSILON);

    let candidate = &out.candidates[0];
    assert_eq!(candidate.sha, orphan.sha);

    let top = &candidate.probable_beads[0];
    assert_eq!(top.bead_id, BEAD);
    assert_eq!(top.reasons, ["timing", "files", "message", "author"]);
    // 30 (timing) + 10 (one file) + 20 (message) + 20 (author)
    assert_eq!(top.confidence, 80);
    assert_eq!(candidate.suspicion_score, 80);

    assert_eq!(out.by_bead[BEAD], vec![orphan.sha]);
    assert_eq!(out.git_range, "all history");
    assert!(out.data_hash.starts_with("blake3:"));
    assert!(!out.cancelled);
}

#[test]
fn commit_after_close_misses_the_timing_signal() {
    let report = fixture();
    let detector = OrphanDetector::new(&report, CorrelateConfig::default());

    // 2h ago is after the bead closed 24h ago.
    let late = commit('c', 2, AUTHOR_EMAIL, "fix token refresh", &["src/auth/token.rs"]);
    let out = detector.detect(&[late], &DetectOptions::default(), &CancelFlag::new());

    let top = &out.candidates[0].probable_beads[0];
    assert_eq!(top.reasons, ["files", "message", "author"]);
    assert_eq!(top.confidence, 50);
}

#[test]
fn lookup_over_the_same_fixture_refreshes_status() {
    let mut report = fixture();
    let lookup = FileLookup::new(&report);
    let result = lookup.lookup_by_file("src/auth/token.rs");
    assert_eq!(result.total_beads, 1);
    assert_eq!(result.closed_beads.len(), 1, "bead is closed in the ledger");

    // Reopen the bead; a fresh lookup over the same index must follow.
    report.histories.get_mut(BEAD).expect("bead exists").status = BeadStatus::InProgress;
    let index = tether_correlate::build_file_index(Some(&report));
    let lookup = FileLookup::from_parts(index, &report.histories);
    let result = lookup.lookup_by_file("src/auth/token.rs");
    assert_eq!(result.open_beads.len(), 1);
}

#[test]
fn fingerprint_tracks_the_underlying_data() {
    let report = fixture();
    let commits = vec![report.histories[BEAD].commits[0].clone()];
    let baseline = data_hash(&report, &commits);

    assert_eq!(baseline, data_hash(&report, &commits), "same snapshot, same hash");

    let extra = commit('d', 1, AUTHOR_EMAIL, "unrelated", &[]);
    let mut grown = commits.clone();
    grown.push(extra);
    assert_ne!(baseline, data_hash(&report, &grown), "new commit, new hash");
}
