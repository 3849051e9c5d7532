//! Bead ledger records: the unit of tracked work and its lifecycle status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The four lifecycle statuses a bead can carry in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeadStatus {
    Open,
    InProgress,
    Blocked,
    Closed,
}

impl BeadStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Blocked => "blocked",
            Self::Closed => "closed",
        }
    }

    /// Anything other than `closed` counts as open for lookup bucketing.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for BeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown bead status {value:?}")]
pub struct ParseStatusError {
    pub value: String,
}

impl FromStr for BeadStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "blocked" => Ok(Self::Blocked),
            "closed" => Ok(Self::Closed),
            other => Err(ParseStatusError {
                value: other.to_string(),
            }),
        }
    }
}

/// One row of the bead ledger.
///
/// Beads are read from `.beads/beads.jsonl`, one JSON object per line.
/// The core never mutates the ledger; this record is a read-only snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bead {
    pub id: String,
    pub title: String,
    pub status: BeadStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    pub created: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed: Option<DateTime<Utc>>,
}

impl Bead {
    /// The timestamp at which this bead entered active work.
    ///
    /// Falls back to the created timestamp for beads that left `open`
    /// without an explicit claim event recorded in the ledger. Beads that
    /// are still `open` and were never claimed have no active period.
    #[must_use]
    pub fn claimed_at(&self) -> Option<DateTime<Utc>> {
        if self.claimed.is_some() {
            return self.claimed;
        }
        if self.status == BeadStatus::Open {
            None
        } else {
            Some(self.created)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bead(status: BeadStatus) -> Bead {
        Bead {
            id: "bd-x1".to_string(),
            title: "Test bead".to_string(),
            status,
            assignee: None,
            created: Utc.with_ymd_and_hms(2026, 1, 10, 8, 0, 0).single().expect("valid ts"),
            claimed: None,
            closed: None,
        }
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            BeadStatus::Open,
            BeadStatus::InProgress,
            BeadStatus::Blocked,
            BeadStatus::Closed,
        ] {
            let parsed: BeadStatus = status.as_str().parse().expect("parse back");
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn unknown_status_is_an_error() {
        let err = "cancelled".parse::<BeadStatus>().expect_err("must fail");
        assert_eq!(err.value, "cancelled");
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&BeadStatus::InProgress).expect("serialize");
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn only_closed_buckets_as_closed() {
        assert!(BeadStatus::Closed.is_closed());
        assert!(!BeadStatus::Open.is_closed());
        assert!(!BeadStatus::InProgress.is_closed());
        assert!(!BeadStatus::Blocked.is_closed());
    }

    #[test]
    fn claimed_at_prefers_explicit_claim() {
        let mut b = bead(BeadStatus::InProgress);
        let claim = Utc.with_ymd_and_hms(2026, 1, 12, 9, 0, 0).single().expect("valid ts");
        b.claimed = Some(claim);
        assert_eq!(b.claimed_at(), Some(claim));
    }

    #[test]
    fn claimed_at_falls_back_to_created_when_not_open() {
        let b = bead(BeadStatus::InProgress);
        assert_eq!(b.claimed_at(), Some(b.created));
    }

    #[test]
    fn unclaimed_open_bead_has_no_active_period() {
        let b = bead(BeadStatus::Open);
        assert_eq!(b.claimed_at(), None);
    }
}
