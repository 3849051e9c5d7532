//! Assembly of the correlation snapshot: ledger beads + commit stream →
//! [`HistoryReport`].
//!
//! Commits link to beads by mentioning a bead ID (e.g. `bd-1pj6`) anywhere
//! in the message. Matching is case-insensitive; references to IDs that do
//! not exist in the ledger are ignored.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use regex::Regex;
use tether_core::history::{BeadEvent, BeadHistory, BeadMilestones, CorrelatedCommit, HistoryReport};
use tether_core::model::Bead;
use tracing::instrument;

/// Compile the bead-ID matcher for a ledger prefix.
///
/// # Errors
///
/// Returns an error if the prefix produces an invalid pattern (it is
/// escaped first, so this indicates a bug rather than bad user input).
pub fn bead_id_regex(id_prefix: &str) -> Result<Regex> {
    let pattern = format!(r"(?i)\b{}-[a-z0-9]+\b", regex::escape(id_prefix));
    Regex::new(&pattern).with_context(|| format!("Failed to compile ID pattern for {id_prefix:?}"))
}

/// Build the [`HistoryReport`] for one snapshot of ledger and history.
///
/// Every ledger bead gets a history entry (commitless beads still carry
/// milestones, which the temporal model needs); the forward index only
/// records commits that mention at least one known bead.
///
/// # Errors
///
/// Returns an error only if the ID pattern fails to compile.
#[instrument(skip_all, fields(beads = beads.len(), commits = commits.len()))]
pub fn build_history_report(
    beads: &[Bead],
    commits: &[CorrelatedCommit],
    id_prefix: &str,
) -> Result<HistoryReport> {
    let matcher = bead_id_regex(id_prefix)?;

    // Lowercased ID → canonical ledger ID, for case-insensitive matches.
    let known: BTreeMap<String, &str> = beads
        .iter()
        .map(|bead| (bead.id.to_lowercase(), bead.id.as_str()))
        .collect();

    let mut histories: BTreeMap<String, BeadHistory> = beads
        .iter()
        .map(|bead| {
            (
                bead.id.clone(),
                BeadHistory {
                    title: bead.title.clone(),
                    status: bead.status,
                    last_author: None,
                    milestones: milestones_for(bead),
                    commits: Vec::new(),
                },
            )
        })
        .collect();

    let mut commit_index: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for commit in commits {
        let mut linked: Vec<String> = Vec::new();
        for found in matcher.find_iter(&commit.message) {
            let Some(canonical) = known.get(&found.as_str().to_lowercase()) else {
                continue;
            };
            if !linked.iter().any(|id| id == canonical) {
                linked.push((*canonical).to_string());
            }
        }

        if linked.is_empty() {
            continue;
        }

        for bead_id in &linked {
            if let Some(history) = histories.get_mut(bead_id) {
                history.commits.push(commit.clone());
            }
        }
        commit_index.insert(commit.sha.clone(), linked);
    }

    // Commits arrive newest first, so the first linked commit names the
    // most recent author.
    for history in histories.values_mut() {
        history.last_author = history.commits.first().map(|c| c.author.clone());
    }

    Ok(HistoryReport {
        histories,
        commit_index,
    })
}

fn milestones_for(bead: &Bead) -> BeadMilestones {
    BeadMilestones {
        claimed: bead.claimed_at().map(|timestamp| BeadEvent {
            timestamp,
            actor: bead.assignee.clone(),
        }),
        closed: bead.closed.map(|timestamp| BeadEvent {
            timestamp,
            actor: None,
        }),
    }
}
