//! Structured-form audit sink.
//!
//! Persists a JSON array of sealed records, rewritten in full on each
//! append (read-modify-write). Absent or corrupt prior content is treated
//! as an empty collection rather than a failure — an audit trail must keep
//! accepting records even after its file was damaged.
//!
//! The read-modify-write cycle is serialized behind an internal mutex so
//! concurrent appends from one process cannot lose records.

use std::path::PathBuf;
use std::sync::Mutex;

use tracing::warn;

use quell_contracts::{
    error::{QuellError, QuellResult},
    record::{AuditFormat, AuditRecord, SealedRecord, SinkInfo},
};
use quell_core::traits::AuditSink;

use crate::{file_info, seal};

/// An append-only structured audit log backed by a single JSON file.
pub struct JsonAuditSink {
    path: PathBuf,
    /// Guards the read-modify-write cycle.
    write_lock: Mutex<()>,
}

impl JsonAuditSink {
    /// Open (or initialize) the structured log at `path`.
    pub fn new(path: PathBuf) -> QuellResult<Self> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir).map_err(|e| QuellError::Config {
                    reason: format!("failed to create audit directory '{}': {e}", dir.display()),
                })?;
            }
        }
        if !path.exists() {
            std::fs::write(&path, "[]").map_err(|e| QuellError::Config {
                reason: format!("failed to initialize audit file '{}': {e}", path.display()),
            })?;
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Load the persisted collection, treating any read or parse failure
    /// as an empty collection.
    fn load(&self) -> Vec<SealedRecord> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str(&contents) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "audit file unreadable; treating as empty collection"
                );
                Vec::new()
            }
        }
    }
}

impl AuditSink for JsonAuditSink {
    fn record(&self, record: &AuditRecord) -> QuellResult<()> {
        let _guard = self.write_lock.lock().expect("audit write lock poisoned");

        let mut entries = self.load();
        entries.push(seal::seal(record));

        let serialized =
            serde_json::to_string_pretty(&entries).map_err(|e| QuellError::AuditWriteFailed {
                reason: format!("failed to serialize audit collection: {e}"),
            })?;
        std::fs::write(&self.path, serialized).map_err(|e| QuellError::AuditWriteFailed {
            reason: format!("failed to write '{}': {e}", self.path.display()),
        })
    }

    fn recent_entries(&self, limit: usize) -> Vec<SealedRecord> {
        let entries = self.load();
        let skip = entries.len().saturating_sub(limit);
        entries.into_iter().skip(skip).collect()
    }

    fn info(&self) -> SinkInfo {
        file_info(AuditFormat::Json, &self.path)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
