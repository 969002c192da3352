//! Core trait definitions for the Quell dispatch pipeline.
//!
//! These traits define the seams of the agent:
//!
//! - `RemediationHandler` — one event type's remediation lifecycle
//! - `HandlerRegistry`    — maps event types to handler constructors
//! - `AuditSink`          — records every dispatch outcome durably
//! - `SaasProvider` / `StorageProvider` — the external provider calls
//!
//! The dispatcher wires them together and enforces the lifecycle ordering:
//! `execute()` is never called unless `validate()` returned `Success`.

use quell_contracts::{
    error::{ProviderError, QuellResult},
    event::Event,
    mode::Mode,
    outcome::ProviderOutcome,
    record::{AuditRecord, SealedRecord, SinkInfo},
    result::ValidationVerdict,
};

/// The three-phase remediation contract for one event type.
///
/// One instance is created per dispatched event and destroyed after
/// `report()` completes. The instance holds the event, the mode copied from
/// the dispatcher at construction time, and the ordered provider-call
/// outcomes accumulated during `execute()`.
pub trait RemediationHandler {
    /// The handler variant name, used in the dispatch banner and registry
    /// configuration.
    fn name(&self) -> &'static str;

    /// Check that the event carries this handler's required fields.
    ///
    /// Pure — no side effects, callable before `execute()`. Returns
    /// `Failed` with a field-identifying message when any required field is
    /// missing or empty.
    fn validate(&self) -> ValidationVerdict;

    /// Perform (or simulate) the remediation and return a one-line
    /// narrative of what happened.
    ///
    /// The dispatcher only calls this after `validate()` returned
    /// `Success`. In dry-run mode no provider call is made; one synthesized
    /// outcome is recorded per expected adapter call and the narrative
    /// starts with `DRY RUN`. In live mode every raised [`ProviderError`]
    /// is caught, converted to a recorded outcome, and narrated as an
    /// `EXCEPTION` line — it never propagates to the dispatcher.
    fn execute(&mut self) -> String;

    /// A one-line summary reflecting mode and outcome.
    ///
    /// Must tolerate an empty outcome history.
    fn report(&self) -> String;

    /// Everything accumulated during `execute()`, in call order.
    fn outcomes(&self) -> &[ProviderOutcome];
}

/// Maps a declared event type to a fresh handler instance.
///
/// Built once at startup from configuration; immutable afterwards. Absence
/// of a key is a normal (non-error) outcome signaling "no handler".
pub trait HandlerRegistry: Send + Sync {
    /// Create a handler for `event_type`, scoped to `event` and `mode`,
    /// or `None` when no handler is registered for that type.
    fn create(
        &self,
        event_type: &str,
        event: &Event,
        mode: Mode,
    ) -> Option<Box<dyn RemediationHandler>>;

    /// The event types this registry can dispatch, sorted.
    fn event_types(&self) -> Vec<String>;
}

/// The durable audit trail.
///
/// `record()` is append-only; persisted records are never modified or
/// deleted. The dispatcher catches write failures at its own boundary, so a
/// failed append never alters a dispatch result.
pub trait AuditSink: Send + Sync {
    /// Append one dispatch record.
    fn record(&self, record: &AuditRecord) -> QuellResult<()>;

    /// The last `limit` persisted records, oldest first.
    ///
    /// Defined only for the structured form; the document form returns an
    /// empty list (its metadata is available via `info()`).
    fn recent_entries(&self, limit: usize) -> Vec<SealedRecord>;

    /// Metadata about the sink's backing file.
    fn info(&self) -> SinkInfo;
}

/// Provider calls for SaaS access remediation.
///
/// Implementations are stateless per call. The shipped implementation is a
/// deterministic simulation; a real client or a test double can be injected
/// without changing any handler behavior.
pub trait SaasProvider: Send + Sync {
    /// Revoke `user`'s access to `source`.
    fn revoke_access(&self, user: &str, source: &str)
        -> Result<ProviderOutcome, ProviderError>;
}

/// Provider calls for storage-visibility remediation.
pub trait StorageProvider: Send + Sync {
    /// Block all public access to `bucket`.
    fn block_public_access(
        &self,
        bucket: &str,
        region: &str,
    ) -> Result<ProviderOutcome, ProviderError>;

    /// Apply a restrictive bucket policy document to `bucket`.
    fn apply_restrictive_policy(
        &self,
        bucket: &str,
        policy: &serde_json::Value,
    ) -> Result<ProviderOutcome, ProviderError>;
}
