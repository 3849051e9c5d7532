//! Temporal windows and author associations derived from the history
//! report, used as matching signals by the orphan detector.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tether_core::history::{BeadMilestones, HistoryReport};

/// The interval during which a bead was actively being worked.
///
/// Bounded below by the claimed milestone. Closed beads are bounded above
/// by the closed milestone; open beads extend toward the present, so they
/// stay eligible for the timing signal no matter how long ago they were
/// claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalWindow {
    pub start: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

impl TemporalWindow {
    /// Derive a window from milestone events; `None` without a claim.
    #[must_use]
    pub fn from_milestones(milestones: &BeadMilestones) -> Option<Self> {
        let claimed = milestones.claimed.as_ref()?;
        Some(Self {
            start: claimed.timestamp,
            end: milestones.closed.as_ref().map(|event| event.timestamp),
        })
    }

    /// Membership test: inclusive at both bounds, open-ended when the bead
    /// has not closed.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && self.end.is_none_or(|end| instant <= end)
    }

    /// Human-readable bounds for signal details.
    #[must_use]
    pub fn describe(&self) -> String {
        let start = self.start.format("%Y-%m-%d %H:%M");
        match self.end {
            Some(end) => format!("{start} to {}", end.format("%Y-%m-%d %H:%M")),
            None => format!("{start} to now"),
        }
    }
}

/// Per-bead activity windows for every bead with a claimed milestone.
#[must_use]
pub fn bead_windows(report: &HistoryReport) -> BTreeMap<String, TemporalWindow> {
    report
        .histories
        .iter()
        .filter_map(|(bead_id, history)| {
            TemporalWindow::from_milestones(&history.milestones)
                .map(|window| (bead_id.clone(), window))
        })
        .collect()
}

/// Author email → the set of bead IDs that author has ever committed against.
///
/// Set semantics make the insert idempotent: an email already mapped to a
/// bead is not duplicated.
#[must_use]
pub fn author_associations(report: &HistoryReport) -> BTreeMap<String, BTreeSet<String>> {
    let mut associations: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for (bead_id, history) in &report.histories {
        for commit in &history.commits {
            if commit.author_email.is_empty() {
                continue;
            }
            associations
                .entry(commit.author_email.clone())
                .or_default()
                .insert(bead_id.clone());
        }
    }
    associations
}
