//! Dispatch results and validation verdicts.
//!
//! `DispatchResult` is what the dispatcher returns to the transport boundary
//! after each event. `ValidationVerdict` is what a handler's validate phase
//! produces before the dispatcher decides whether execute may run.

use serde::{Deserialize, Serialize};

/// The terminal state of one dispatched event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStatus {
    /// A handler ran its full validate → execute → report lifecycle.
    ///
    /// Note: a live-mode remediation whose provider said no still reports
    /// `Processed` — the failure is surfaced in the report line and the
    /// recorded outcomes, not in this field.
    Processed,
    /// The handler's required-field validation failed; execute never ran.
    ValidationFailed,
    /// No handler is registered for the event's type. A normal outcome,
    /// not an error.
    Ignored,
    /// The event could not be dispatched at all (missing `type`).
    Error,
}

impl std::fmt::Display for DispatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DispatchStatus::Processed => "processed",
            DispatchStatus::ValidationFailed => "validation_failed",
            DispatchStatus::Ignored => "ignored",
            DispatchStatus::Error => "error",
        };
        f.write_str(label)
    }
}

/// The result returned to the caller for every dispatched event.
///
/// Invariant: `log` is never empty. The `Error` case carries exactly one
/// diagnostic line; handler paths carry the banner, validation, execute,
/// and report lines in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchResult {
    pub status: DispatchStatus,
    /// Human-readable processing trace, in phase order.
    pub log: Vec<String>,
}

impl DispatchResult {
    pub fn new(status: DispatchStatus, log: Vec<String>) -> Self {
        Self { status, log }
    }
}

/// The outcome of a handler's validate phase.
///
/// `detail` identifies the fields that were checked (on success) or the
/// fields that were missing or empty (on failure).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationVerdict {
    Success { detail: String },
    Failed { detail: String },
}

impl ValidationVerdict {
    pub fn is_success(&self) -> bool {
        matches!(self, ValidationVerdict::Success { .. })
    }
}
