//! Project configuration loaded from `.tether/config.toml`.
//!
//! Missing file means defaults; a present file only needs to set the keys it
//! wants to override.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub correlate: CorrelateConfig,
}

/// Where the ledger lives and how history is extracted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Ledger path, relative to the repository root.
    #[serde(default = "default_ledger")]
    pub ledger: String,
    /// Bead-ID prefix matched inside commit messages (e.g. `bd` for `bd-1pj6`).
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,
    /// Git executable to invoke.
    #[serde(default = "default_git_binary")]
    pub git_binary: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ledger: default_ledger(),
            id_prefix: default_id_prefix(),
            git_binary: default_git_binary(),
        }
    }
}

/// Signal weights and the detection threshold for orphan scoring.
///
/// Per-bead confidence is the sum of fired signal weights capped at 100,
/// so the defaults are chosen to make the cap reachable: 30 + 30 + 20 + 20.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelateConfig {
    /// Weight when a commit lands inside a bead's active window.
    #[serde(default = "default_timing_weight")]
    pub timing_weight: u32,
    /// Weight contributed per overlapping file.
    #[serde(default = "default_files_weight_per_file")]
    pub files_weight_per_file: u32,
    /// Upper bound on the file-overlap signal.
    #[serde(default = "default_files_weight_cap")]
    pub files_weight_cap: u32,
    /// Weight when the commit message mentions the bead title or a keyword.
    #[serde(default = "default_message_weight")]
    pub message_weight: u32,
    /// Weight when the commit author has prior commits on the bead.
    #[serde(default = "default_author_weight")]
    pub author_weight: u32,
    /// Minimum suspicion score for a commit to be reported as a candidate.
    #[serde(default = "default_min_suspicion")]
    pub min_suspicion: u32,
}

impl Default for CorrelateConfig {
    fn default() -> Self {
        Self {
            timing_weight: default_timing_weight(),
            files_weight_per_file: default_files_weight_per_file(),
            files_weight_cap: default_files_weight_cap(),
            message_weight: default_message_weight(),
            author_weight: default_author_weight(),
            min_suspicion: default_min_suspicion(),
        }
    }
}

fn default_ledger() -> String {
    ".beads/beads.jsonl".to_string()
}

fn default_id_prefix() -> String {
    "bd".to_string()
}

fn default_git_binary() -> String {
    "git".to_string()
}

const fn default_timing_weight() -> u32 {
    30
}

const fn default_files_weight_per_file() -> u32 {
    10
}

const fn default_files_weight_cap() -> u32 {
    30
}

const fn default_message_weight() -> u32 {
    20
}

const fn default_author_weight() -> u32 {
    20
}

const fn default_min_suspicion() -> u32 {
    40
}

/// Load `.tether/config.toml` under `project_root`, or defaults when absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(".tether/config.toml");
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}
