#![forbid(unsafe_code)]
//! tether-correlate library.
//!
//! The correlation engine: a reverse index from file paths to the beads
//! that touched them, temporal/author association models, and the
//! multi-signal orphan detector that ranks candidate beads for commits
//! lacking an explicit issue linkage.
//!
//! Everything here is a pure, synchronous batch computation over an
//! immutable [`tether_core::HistoryReport`] snapshot: no I/O, no shared
//! mutable state, no errors for absent data. The only fallible surface is
//! glob-pattern compilation in [`lookup::FileLookup::lookup_by_glob`].
//!
//! # Conventions
//!
//! - **Errors**: total functions return plain values; typed errors only
//!   where the caller must branch (bad glob pattern).
//! - **Logging**: `tracing` macros, `#[instrument]` on build/detect entry
//!   points.

pub mod file_index;
pub mod lookup;
pub mod orphan;
pub mod path;
pub mod report;
pub mod temporal;

pub use file_index::{BeadReference, FileBeadIndex, FileIndexStats, build_file_index};
pub use lookup::{FileBeadLookupResult, FileHotspot, FileLookup, GlobPatternError};
pub use orphan::{
    CancelFlag, DetectOptions, OrphanCandidate, OrphanDetector, OrphanSignal, OrphanSignalHit,
    ProbableBead,
};
pub use path::{append_unique, normalize_path};
pub use report::{OrphanReport, OrphanReportStats, data_hash, format_range};
pub use temporal::{TemporalWindow, author_associations, bead_windows};
