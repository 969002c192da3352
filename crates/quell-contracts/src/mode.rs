//! Execution mode: dry-run or live.

use serde::{Deserialize, Serialize};

/// Whether provider actions are simulated or actually performed.
///
/// The dispatcher owns the single source of truth for the current mode.
/// Handler instances receive a copy at construction time and never observe
/// a toggle that happens mid-dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    /// Provider actions are simulated; no real call is made.
    DryRun,
    /// Provider actions are executed.
    Live,
}

impl Mode {
    /// Build from the `dry_run_mode` configuration flag.
    pub fn from_dry_run_flag(dry_run: bool) -> Self {
        if dry_run {
            Mode::DryRun
        } else {
            Mode::Live
        }
    }

    /// The flipped mode.
    pub fn toggled(self) -> Self {
        match self {
            Mode::DryRun => Mode::Live,
            Mode::Live => Mode::DryRun,
        }
    }

    pub fn is_dry_run(self) -> bool {
        matches!(self, Mode::DryRun)
    }

    /// Human-readable label used in log lines and audit documents.
    pub fn label(self) -> &'static str {
        match self {
            Mode::DryRun => "DRY RUN",
            Mode::Live => "LIVE",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
