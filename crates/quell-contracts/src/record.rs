//! Audit records and sink metadata.
//!
//! An [`AuditRecord`] is the append-only account of one dispatch decision
//! and its effects. Sinks seal each record with a SHA-256 digest before
//! persisting (see `quell-audit::seal`); both physical encodings carry the
//! same logical content, so either is a complete projection of the record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{event::Event, mode::Mode, outcome::ProviderOutcome, result::DispatchResult};

/// One persisted dispatch decision. Never mutated or deleted after write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Unique identifier for this record (distinct from the event's own
    /// `event_id`; the same event dispatched twice yields two records).
    pub record_id: uuid::Uuid,
    /// Wall-clock time the record was created (UTC).
    pub timestamp: DateTime<Utc>,
    /// The mode the dispatch ran under, captured at dispatch start.
    pub mode: Mode,
    /// The inbound event, verbatim.
    pub event: Event,
    /// The result returned to the caller.
    pub result: DispatchResult,
    /// Every provider-call outcome collected during execute, in call order.
    /// Empty when no handler ran (`ignored` / `error` paths).
    pub provider_outcomes: Vec<ProviderOutcome>,
}

impl AuditRecord {
    pub fn new(
        mode: Mode,
        event: Event,
        result: DispatchResult,
        provider_outcomes: Vec<ProviderOutcome>,
    ) -> Self {
        Self {
            record_id: uuid::Uuid::new_v4(),
            timestamp: Utc::now(),
            mode,
            event,
            result,
            provider_outcomes,
        }
    }
}

/// An [`AuditRecord`] plus its integrity digest, as persisted by a sink.
///
/// `digest` is the lowercase hex SHA-256 of the record's canonical JSON.
/// Recomputing it over `record` detects any post-write tampering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SealedRecord {
    pub digest: String,
    pub record: AuditRecord,
}

/// The physical encoding an audit sink writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditFormat {
    /// Human-readable document form, one section appended per record.
    Markdown,
    /// Structured form: a JSON array of sealed records, rewritten in full
    /// on each append.
    Json,
}

impl std::fmt::Display for AuditFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditFormat::Markdown => f.write_str("markdown"),
            AuditFormat::Json => f.write_str("json"),
        }
    }
}

/// Metadata about an audit sink's backing file, consumed by status
/// accessors. Both sink forms provide this; only the structured form can
/// additionally return parsed entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinkInfo {
    pub format: AuditFormat,
    pub file: String,
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}
