use std::fmt;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotARepository,
    ConfigParseError,
    LedgerNotFound,
    LedgerParseError,
    GitLogFailed,
    GitOutputMalformed,
    InvalidGlobPattern,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotARepository => "E1001",
            Self::ConfigParseError => "E1002",
            Self::LedgerNotFound => "E2001",
            Self::LedgerParseError => "E2002",
            Self::GitLogFailed => "E3001",
            Self::GitOutputMalformed => "E3002",
            Self::InvalidGlobPattern => "E4001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotARepository => "Not a git repository",
            Self::ConfigParseError => "Config file parse error",
            Self::LedgerNotFound => "Bead ledger not found",
            Self::LedgerParseError => "Bead ledger parse error",
            Self::GitLogFailed => "git log invocation failed",
            Self::GitOutputMalformed => "Unexpected git log output",
            Self::InvalidGlobPattern => "Invalid glob pattern",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotARepository => Some("Run tether inside a git repository or pass --repo."),
            Self::ConfigParseError => Some("Fix syntax in .tether/config.toml and retry."),
            Self::LedgerNotFound => {
                Some("Point --ledger (or [scan].ledger) at the beads JSONL file.")
            }
            Self::LedgerParseError => Some("Each ledger line must be one JSON bead object."),
            Self::GitLogFailed => Some("Check that git is installed and the repository is readable."),
            Self::GitOutputMalformed => Some("Retry; if persistent, report a bug with TETHER_LOG=debug output."),
            Self::InvalidGlobPattern => Some("Quote the pattern and check its wildcard syntax."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
