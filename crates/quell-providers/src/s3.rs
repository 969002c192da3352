//! Simulated AWS S3 API.
//!
//! Failure injection markers (substring of the bucket name):
//!
//! | marker       | call                       | behavior                          |
//! |--------------|----------------------------|-----------------------------------|
//! | `exception`  | `block_public_access`      | raises `ProviderError::Network`   |
//! | `permission` | `block_public_access`      | raises `ProviderError::Authorization` |
//! | `notfound`   | `block_public_access`      | raises `ProviderError::NotFound`  |
//! | `invalid`    | `apply_restrictive_policy` | raises `ProviderError::Validation` |

use tracing::debug;

use quell_contracts::{
    error::ProviderError,
    outcome::ProviderOutcome,
};
use quell_core::traits::StorageProvider;

/// API call names recorded on the outcomes this adapter produces.
pub const BLOCK_PUBLIC_ACCESS_CALL: &str = "s3.put_public_access_block";
pub const PUT_BUCKET_POLICY_CALL: &str = "s3.put_bucket_policy";

/// A stateless, deterministic simulation of the S3 control-plane API.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockS3Api;

impl MockS3Api {
    pub fn new() -> Self {
        Self
    }
}

impl StorageProvider for MockS3Api {
    fn block_public_access(
        &self,
        bucket: &str,
        region: &str,
    ) -> Result<ProviderOutcome, ProviderError> {
        debug!(bucket, region, "simulating public access block");
        let marker = bucket.to_lowercase();

        if marker.contains("exception") {
            return Err(ProviderError::Network(format!(
                "network error connecting to S3 in region {region}"
            )));
        }
        if marker.contains("permission") {
            return Err(ProviderError::Authorization(format!(
                "access denied: insufficient permissions for bucket {bucket}"
            )));
        }
        if marker.contains("notfound") {
            return Err(ProviderError::NotFound(format!(
                "bucket {bucket} not found in region {region}"
            )));
        }

        Ok(ProviderOutcome::success(
            BLOCK_PUBLIC_ACCESS_CALL,
            format!("public access block applied to bucket {bucket}"),
        )
        .with_detail("bucket", bucket)
        .with_detail("region", region))
    }

    fn apply_restrictive_policy(
        &self,
        bucket: &str,
        policy: &serde_json::Value,
    ) -> Result<ProviderOutcome, ProviderError> {
        debug!(bucket, "simulating bucket policy update");

        if bucket.to_lowercase().contains("invalid") {
            return Err(ProviderError::Validation(format!(
                "invalid bucket policy document for {bucket}"
            )));
        }

        let statements = policy
            .get("Statement")
            .and_then(|s| s.as_array())
            .map(|s| s.len())
            .unwrap_or(0);

        Ok(ProviderOutcome::success(
            PUT_BUCKET_POLICY_CALL,
            format!("bucket policy updated for {bucket}"),
        )
        .with_detail("bucket", bucket)
        .with_detail("policy_statements", statements))
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use quell_contracts::error::ProviderError;
    use quell_core::traits::StorageProvider;

    use super::{MockS3Api, BLOCK_PUBLIC_ACCESS_CALL, PUT_BUCKET_POLICY_CALL};

    #[test]
    fn clean_bucket_block_succeeds() {
        let outcome = MockS3Api::new()
            .block_public_access("reports", "us-east-1")
            .unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.api_call, BLOCK_PUBLIC_ACCESS_CALL);
        assert_eq!(outcome.detail["region"], "us-east-1");
    }

    #[test]
    fn policy_update_counts_statements() {
        let policy = json!({ "Version": "2012-10-17", "Statement": [{}, {}] });
        let outcome = MockS3Api::new()
            .apply_restrictive_policy("reports", &policy)
            .unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.api_call, PUT_BUCKET_POLICY_CALL);
        assert_eq!(outcome.detail["policy_statements"], 2);
    }

    #[test]
    fn exception_marker_raises_network_failure() {
        let err = MockS3Api::new()
            .block_public_access("exception-bucket", "us-east-1")
            .unwrap_err();
        assert!(matches!(err, ProviderError::Network(_)));
    }

    #[test]
    fn permission_marker_raises_authorization_failure() {
        let err = MockS3Api::new()
            .block_public_access("permission-bucket", "us-east-1")
            .unwrap_err();
        assert!(matches!(err, ProviderError::Authorization(_)));
    }

    #[test]
    fn notfound_marker_raises_not_found() {
        let err = MockS3Api::new()
            .block_public_access("notfound-bucket", "us-east-1")
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotFound(_)));
    }

    #[test]
    fn invalid_marker_raises_validation_failure_on_policy_call() {
        let err = MockS3Api::new()
            .apply_restrictive_policy("invalid-bucket", &json!({}))
            .unwrap_err();
        assert!(matches!(err, ProviderError::Validation(_)));
    }
}
