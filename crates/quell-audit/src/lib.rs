//! # quell-audit
//!
//! Append-only audit trail sinks for the Quell remediation agent.
//!
//! Two interchangeable physical encodings of the same logical record:
//!
//! - [`MarkdownAuditSink`] — a growing human-readable document
//! - [`JsonAuditSink`] — a JSON array of records, rewritten on each append
//!
//! Every record is sealed with a SHA-256 digest (see [`seal`]) before it is
//! persisted, so either encoding is tamper-evident and both carry identical
//! semantic content.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use quell_contracts::{
    error::QuellResult,
    record::{AuditFormat, SinkInfo},
};
use quell_core::{config::Settings, traits::AuditSink};

pub mod json;
pub mod markdown;
pub mod seal;

pub use json::JsonAuditSink;
pub use markdown::MarkdownAuditSink;

/// Build the audit sink the configuration selects.
pub fn sink_from_settings(settings: &Settings) -> QuellResult<Box<dyn AuditSink>> {
    let path = PathBuf::from(&settings.audit_file);
    Ok(match settings.audit_format {
        AuditFormat::Markdown => Box::new(MarkdownAuditSink::new(path)?),
        AuditFormat::Json => Box::new(JsonAuditSink::new(path)?),
    })
}

/// Shared `info()` implementation for both sinks.
pub(crate) fn file_info(format: AuditFormat, path: &Path) -> SinkInfo {
    let metadata = std::fs::metadata(path).ok();
    SinkInfo {
        format,
        file: path.display().to_string(),
        exists: metadata.is_some(),
        size_bytes: metadata.as_ref().map(|m| m.len()),
        last_modified: metadata
            .as_ref()
            .and_then(|m| m.modified().ok())
            .map(DateTime::<Utc>::from),
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
