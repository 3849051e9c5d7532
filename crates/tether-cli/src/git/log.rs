//! `git log` invocation and parsing.
//!
//! Commits are read with a record/field-separator pretty format plus
//! `--numstat`, which keeps parsing unambiguous even for multi-line commit
//! messages: `0x1e` opens each record, `0x1f` separates fields, and the
//! numstat block trails the final separator.

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use chrono::DateTime;
use tether_core::error::ErrorCode;
use tether_core::history::{CorrelatedCommit, FileChange};
use tracing::{debug, instrument};

const RECORD_SEP: char = '\u{1e}';
const FIELD_SEP: char = '\u{1f}';

/// Range constraints for a log read.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Read at most this many commits.
    pub limit: Option<usize>,
    /// git-style lower bound (e.g. `"2 weeks ago"`).
    pub since: Option<String>,
}

/// Read commits from the repository at `repo_root`, newest first.
///
/// Merge commits are excluded; they carry no numstat of their own and are
/// never the work a bead tracks.
///
/// # Errors
///
/// Returns an error when git cannot be spawned, exits non-zero, or
/// produces output this parser does not recognize.
#[instrument(skip_all, fields(repo = %repo_root.display()))]
pub fn read_commits(
    repo_root: &Path,
    git_binary: &str,
    opts: &LogOptions,
) -> Result<Vec<CorrelatedCommit>> {
    let mut cmd = Command::new(git_binary);
    cmd.arg("-C")
        .arg(repo_root)
        .arg("log")
        .arg("--numstat")
        .arg("--no-merges")
        .arg("--pretty=format:%x1e%H%x1f%h%x1f%an%x1f%ae%x1f%at%x1f%B%x1f");

    if let Some(limit) = opts.limit {
        cmd.arg(format!("-n{limit}"));
    }
    if let Some(since) = &opts.since {
        cmd.arg(format!("--since={since}"));
    }

    let output = cmd.output().with_context(|| {
        format!("{}: failed to spawn {git_binary}", ErrorCode::GitLogFailed)
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        // An empty repository (no HEAD yet) has no history, not an error.
        if stderr.contains("does not have any commits") {
            return Ok(Vec::new());
        }
        bail!(
            "{}: git log exited with {}: {}",
            ErrorCode::GitLogFailed,
            output.status,
            stderr.trim()
        );
    }

    let commits = parse_log(&String::from_utf8_lossy(&output.stdout))?;
    debug!(count = commits.len(), "read commits");
    Ok(commits)
}

/// Parse the raw separator-framed log output.
pub(crate) fn parse_log(raw: &str) -> Result<Vec<CorrelatedCommit>> {
    let mut commits = Vec::new();

    for record in raw.split(RECORD_SEP) {
        if record.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = record.splitn(7, FIELD_SEP).collect();
        let &[sha, short_sha, author, author_email, unix_ts, message, numstat] = fields.as_slice()
        else {
            bail!(
                "{}: expected 7 log fields, got {}",
                ErrorCode::GitOutputMalformed,
                fields.len()
            );
        };

        let seconds: i64 = unix_ts.trim().parse().with_context(|| {
            format!("{}: bad commit timestamp {unix_ts:?}", ErrorCode::GitOutputMalformed)
        })?;
        let timestamp = DateTime::from_timestamp(seconds, 0).with_context(|| {
            format!("{}: timestamp {seconds} out of range", ErrorCode::GitOutputMalformed)
        })?;

        commits.push(CorrelatedCommit {
            sha: sha.to_string(),
            short_sha: short_sha.to_string(),
            author: author.to_string(),
            author_email: author_email.to_string(),
            timestamp,
            message: message.trim().to_string(),
            files: parse_numstat(numstat),
        });
    }

    Ok(commits)
}

/// Parse the numstat block trailing a commit record.
///
/// Binary files report `-` for both counts; those parse as 0. Rename lines
/// resolve to the new path.
fn parse_numstat(block: &str) -> Vec<FileChange> {
    let mut files = Vec::new();
    for line in block.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.splitn(3, '\t');
        let (Some(insertions), Some(deletions), Some(path)) =
            (parts.next(), parts.next(), parts.next())
        else {
            continue;
        };
        files.push(FileChange {
            path: resolve_rename(path),
            insertions: parse_count(insertions),
            deletions: parse_count(deletions),
        });
    }
    files
}

fn parse_count(raw: &str) -> u64 {
    raw.parse().unwrap_or(0)
}

/// Resolve git's rename notation to the post-rename path.
///
/// Handles both `old => new` and the brace-compressed
/// `prefix/{old => new}/suffix` form.
fn resolve_rename(path: &str) -> String {
    if let Some(open) = path.find('{')
        && let Some(close_offset) = path[open..].find('}')
    {
        let close = open + close_offset;
        let inner = &path[open + 1..close];
        if let Some((_, new)) = inner.split_once(" => ") {
            return format!("{}{}{}", &path[..open], new, &path[close + 1..]);
        }
    }
    if let Some((_, new)) = path.split_once(" => ") {
        return new.to_string();
    }
    path.to_string()
}
