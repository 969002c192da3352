//! The Quell dispatcher: the per-event remediation state machine.
//!
//! Every dispatched event terminates in exactly one of four states:
//!
//! ```text
//! START
//!   -> event `type` missing             => ERROR
//!   -> no handler for event type        => IGNORED
//!   -> handler.validate() = Failed      => VALIDATION_FAILED
//!   -> handler.validate() = Success
//!        -> handler.execute()
//!        -> handler.report()            => PROCESSED
//! ```
//!
//! All four paths unconditionally write an audit record — including ERROR
//! and IGNORED, with empty outcome lists where no handler ran. The audit
//! invariant is absolute: every decision is on record regardless of outcome.

use std::sync::Mutex;

use tracing::{debug, info, warn};

use quell_contracts::{
    event::Event,
    mode::Mode,
    outcome::ProviderOutcome,
    record::{AuditRecord, SealedRecord, SinkInfo},
    result::{DispatchResult, DispatchStatus, ValidationVerdict},
};

use crate::traits::{AuditSink, HandlerRegistry, RemediationHandler};

/// The central dispatcher and process-wide agent state.
///
/// Owns the handler registry (immutable after construction), the audit sink,
/// and the single source of truth for the current execution mode. The mode
/// is read once at the start of each dispatch and stays fixed for that
/// dispatch's lifetime; `toggle_mode()` is the only mutator.
pub struct RemediationAgent {
    registry: Box<dyn HandlerRegistry>,
    audit: Box<dyn AuditSink>,
    mode: Mutex<Mode>,
}

impl RemediationAgent {
    /// Create an agent with the given registry, audit sink, and initial mode.
    pub fn new(registry: Box<dyn HandlerRegistry>, audit: Box<dyn AuditSink>, mode: Mode) -> Self {
        info!(mode = %mode, "remediation agent initialized");
        Self {
            registry,
            audit,
            mode: Mutex::new(mode),
        }
    }

    /// Dispatch one event through its remediation lifecycle.
    ///
    /// This is the sole entry point the transport boundary calls. Input
    /// problems (missing type, unknown type, failed validation) are returned
    /// as typed statuses, never raised; infrastructure failures are already
    /// converted inside the handler's `execute()`. No category crashes the
    /// processing of a single event.
    pub fn dispatch(&self, event: &Event) -> DispatchResult {
        // Capture the mode once — a concurrent toggle must not change the
        // semantics of an in-flight dispatch.
        let mode = *self.mode.lock().expect("mode lock poisoned");

        debug!(
            event_id = event.event_id().unwrap_or("unknown"),
            event_type = event.event_type().unwrap_or("missing"),
            mode = %mode,
            "dispatch starting"
        );

        // ── Gate 1: the event must declare a type ─────────────────────────
        let Some(event_type) = event.event_type() else {
            let result = DispatchResult::new(
                DispatchStatus::Error,
                vec!["event is missing required 'type' field".to_string()],
            );
            self.audit_outcome(event, &result, &[], mode);
            return result;
        };

        // ── Gate 2: a handler must be registered for the type ─────────────
        let Some(mut handler) = self.registry.create(event_type, event, mode) else {
            debug!(event_type, "no handler registered; ignoring");
            let result = DispatchResult::new(
                DispatchStatus::Ignored,
                vec![format!(
                    "no remediation handler registered for event type '{event_type}'"
                )],
            );
            self.audit_outcome(event, &result, &[], mode);
            return result;
        };

        let mut log = vec![format!(
            "--- Event ID: {} | Handler: {} | Mode: {} ---",
            event.event_id().unwrap_or("unknown"),
            handler.name(),
            mode.label()
        )];

        // ── Gate 3: required-field validation ─────────────────────────────
        //
        // execute() is only reachable after a Success verdict; a failed
        // validation means zero provider calls.
        match handler.validate() {
            ValidationVerdict::Failed { detail } => {
                warn!(
                    event_id = event.event_id().unwrap_or("unknown"),
                    handler = handler.name(),
                    "validation failed"
                );
                log.push(format!("FAILED: {detail}"));
                let result = DispatchResult::new(DispatchStatus::ValidationFailed, log);
                self.audit_outcome(event, &result, handler.outcomes(), mode);
                return result;
            }
            ValidationVerdict::Success { detail } => {
                log.push(format!("SUCCESS: {detail}"));
            }
        }

        // ── Execute and report ─────────────────────────────────────────────
        log.push(handler.execute());
        log.push(handler.report());

        let result = DispatchResult::new(DispatchStatus::Processed, log);
        self.audit_outcome(event, &result, handler.outcomes(), mode);
        result
    }

    /// Flip the execution mode and return the new mode.
    ///
    /// No atomicity is guaranteed between a toggle and a concurrently
    /// dispatching request beyond this: each dispatch observes exactly one
    /// mode for its whole lifetime.
    pub fn toggle_mode(&self) -> Mode {
        let mut mode = self.mode.lock().expect("mode lock poisoned");
        *mode = mode.toggled();
        info!(mode = %*mode, "execution mode switched");
        *mode
    }

    /// The current execution mode.
    pub fn mode(&self) -> Mode {
        *self.mode.lock().expect("mode lock poisoned")
    }

    /// The event types a handler is registered for, sorted.
    pub fn event_types(&self) -> Vec<String> {
        self.registry.event_types()
    }

    /// Metadata about the audit sink's backing file.
    pub fn audit_info(&self) -> SinkInfo {
        self.audit.info()
    }

    /// The last `limit` audit records (structured sink form only).
    pub fn recent_audit_entries(&self, limit: usize) -> Vec<SealedRecord> {
        self.audit.recent_entries(limit)
    }

    /// Persist one dispatch outcome.
    ///
    /// A sink failure is reported through the diagnostic channel only — it
    /// never alters the result returned to the caller.
    fn audit_outcome(
        &self,
        event: &Event,
        result: &DispatchResult,
        outcomes: &[ProviderOutcome],
        mode: Mode,
    ) {
        let record = AuditRecord::new(mode, event.clone(), result.clone(), outcomes.to_vec());
        if let Err(e) = self.audit.record(&record) {
            warn!(error = %e, "audit sink write failed; dispatch result unaffected");
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
