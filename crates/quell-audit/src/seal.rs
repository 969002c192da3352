//! Record sealing: tamper-evident digests over audit records.
//!
//! Every record is sealed before it is persisted, in either encoding. The
//! digest is SHA-256 over the record's canonical JSON (serde_json with no
//! pretty-printing), hex-encoded lowercase. Recomputing the digest over a
//! stored record detects any post-write mutation of its content.

use sha2::{Digest, Sha256};

use quell_contracts::record::{AuditRecord, SealedRecord};

/// Compute the lowercase hex SHA-256 digest of `record`'s canonical JSON.
///
/// # Panics
///
/// Panics if `record` cannot be serialized to JSON — which cannot happen
/// for the well-formed `AuditRecord` type.
pub fn record_digest(record: &AuditRecord) -> String {
    let canonical =
        serde_json::to_vec(record).expect("AuditRecord must always be serializable to JSON");
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    hex::encode(hasher.finalize())
}

/// Wrap `record` with its digest for persistence.
pub fn seal(record: &AuditRecord) -> SealedRecord {
    SealedRecord {
        digest: record_digest(record),
        record: record.clone(),
    }
}

/// Return true when the stored digest matches the record's content.
pub fn verify(sealed: &SealedRecord) -> bool {
    sealed.digest == record_digest(&sealed.record)
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use quell_contracts::{
        event::Event,
        mode::Mode,
        record::AuditRecord,
        result::{DispatchResult, DispatchStatus},
    };

    use super::{seal, verify};

    fn make_record() -> AuditRecord {
        AuditRecord::new(
            Mode::Live,
            Event::from_value(json!({ "type": "t", "event_id": "e1" })).unwrap(),
            DispatchResult::new(DispatchStatus::Ignored, vec!["no handler".to_string()]),
            vec![],
        )
    }

    #[test]
    fn sealed_record_verifies() {
        let sealed = seal(&make_record());
        assert!(verify(&sealed));
        assert_eq!(sealed.digest.len(), 64, "lowercase hex SHA-256");
    }

    #[test]
    fn tampering_breaks_the_seal() {
        let mut sealed = seal(&make_record());
        sealed.record.result.log[0] = "TAMPERED".to_string();
        assert!(!verify(&sealed));
    }

    #[test]
    fn distinct_records_get_distinct_digests() {
        let a = seal(&make_record());
        let b = seal(&make_record());
        // record_id and timestamp differ, so digests must too.
        assert_ne!(a.digest, b.digest);
    }
}
