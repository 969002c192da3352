//! Document-form audit sink.
//!
//! Appends one human-readable section per record to a growing markdown
//! document. The document is initialized with a fixed header on first use.
//! This form is for human review; `recent_entries()` yields nothing and
//! callers use `info()` for file metadata instead.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use tracing::debug;

use quell_contracts::{
    error::{QuellError, QuellResult},
    record::{AuditFormat, AuditRecord, SealedRecord, SinkInfo},
};
use quell_core::traits::AuditSink;

use crate::{file_info, seal};

const HEADER: &str = "# Quell Agent Audit Trail\n\n\
    This file contains a detailed audit trail of all security remediation actions.\n\n\
    ---\n\n";

/// An append-only, human-readable audit document.
pub struct MarkdownAuditSink {
    path: PathBuf,
}

impl MarkdownAuditSink {
    /// Open (or initialize) the document at `path`.
    ///
    /// Creates the parent directory and writes the fixed header when the
    /// file does not yet exist.
    pub fn new(path: PathBuf) -> QuellResult<Self> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir).map_err(|e| QuellError::Config {
                    reason: format!("failed to create audit directory '{}': {e}", dir.display()),
                })?;
            }
        }
        if !path.exists() {
            std::fs::write(&path, HEADER).map_err(|e| QuellError::Config {
                reason: format!("failed to initialize audit file '{}': {e}", path.display()),
            })?;
            debug!(path = %path.display(), "initialized markdown audit document");
        }
        Ok(Self { path })
    }

    fn render(sealed: &SealedRecord) -> String {
        let record = &sealed.record;
        let mut out = String::new();

        out.push_str(&format!(
            "## Action Report - {}\n\n",
            record.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        out.push_str(&format!("**Record ID:** {}\n\n", record.record_id));
        out.push_str(&format!("**Mode:** {}\n\n", record.mode.label()));
        out.push_str(&format!(
            "**Event ID:** {}\n\n",
            record.event.event_id().unwrap_or("N/A")
        ));
        out.push_str(&format!(
            "**Event Type:** {}\n\n",
            record.event.event_type().unwrap_or("N/A")
        ));
        out.push_str(&format!("**Status:** {}\n\n", record.result.status));
        out.push_str(&format!("**Digest:** `{}`\n\n", sealed.digest));

        out.push_str("### Event Details\n```json\n");
        out.push_str(
            &serde_json::to_string_pretty(&record.event.as_value()).unwrap_or_default(),
        );
        out.push_str("\n```\n\n");

        out.push_str("### Processing Log\n");
        for line in &record.result.log {
            out.push_str(&format!("- {line}\n"));
        }
        out.push('\n');

        if !record.provider_outcomes.is_empty() {
            out.push_str("### Provider Outcomes\n");
            for outcome in &record.provider_outcomes {
                out.push_str("```json\n");
                out.push_str(&serde_json::to_string_pretty(outcome).unwrap_or_default());
                out.push_str("\n```\n\n");
            }
        }

        out.push_str("---\n\n");
        out
    }
}

impl AuditSink for MarkdownAuditSink {
    fn record(&self, record: &AuditRecord) -> QuellResult<()> {
        let sealed = seal::seal(record);
        let section = Self::render(&sealed);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| QuellError::AuditWriteFailed {
                reason: format!("failed to open '{}': {e}", self.path.display()),
            })?;
        file.write_all(section.as_bytes())
            .map_err(|e| QuellError::AuditWriteFailed {
                reason: format!("failed to append to '{}': {e}", self.path.display()),
            })
    }

    /// The document form is not machine-readable; metadata only.
    fn recent_entries(&self, _limit: usize) -> Vec<SealedRecord> {
        Vec::new()
    }

    fn info(&self) -> SinkInfo {
        file_info(AuditFormat::Markdown, &self.path)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
