//! Handler for publicly exposed storage buckets.
//!
//! Requires `bucket_name` and `region` fields. Live mode makes two provider
//! calls in sequence — block public access, then apply a restrictive bucket
//! policy — recording both outcomes in call order. A recoverable
//! `success: false` first outcome does not stop the second call; a raised
//! failure is caught, converted, and ends the execute phase with an
//! `EXCEPTION` narrative.

use std::sync::Arc;

use serde_json::json;

use quell_contracts::{
    event::Event,
    mode::Mode,
    outcome::ProviderOutcome,
    result::ValidationVerdict,
};
use quell_core::traits::{RemediationHandler, StorageProvider};

const BLOCK_PUBLIC_ACCESS_CALL: &str = "s3.put_public_access_block";
const PUT_BUCKET_POLICY_CALL: &str = "s3.put_bucket_policy";

/// Remediates a publicly exposed bucket by blocking public access and
/// tightening its policy.
pub struct StorageVisibilityHandler {
    event: Event,
    mode: Mode,
    provider: Arc<dyn StorageProvider>,
    outcomes: Vec<ProviderOutcome>,
}

impl StorageVisibilityHandler {
    pub fn new(event: &Event, mode: Mode, provider: Arc<dyn StorageProvider>) -> Self {
        Self {
            event: event.clone(),
            mode,
            provider,
            outcomes: Vec::new(),
        }
    }

    fn bucket(&self) -> &str {
        self.event.field("bucket_name").unwrap_or("unknown")
    }

    fn region(&self) -> &str {
        self.event.field("region").unwrap_or("unknown")
    }

    /// The deny-insecure-transport policy applied in the second call.
    fn restrictive_policy(bucket: &str) -> serde_json::Value {
        json!({
            "Version": "2012-10-17",
            "Statement": [{
                "Effect": "Deny",
                "Principal": "*",
                "Action": "s3:GetObject",
                "Resource": format!("arn:aws:s3:::{bucket}/*"),
                "Condition": { "Bool": { "aws:SecureTransport": "false" } }
            }]
        })
    }
}

impl RemediationHandler for StorageVisibilityHandler {
    fn name(&self) -> &'static str {
        "StorageVisibilityHandler"
    }

    fn validate(&self) -> ValidationVerdict {
        if self.event.field("bucket_name").is_some() && self.event.field("region").is_some() {
            ValidationVerdict::Success {
                detail: "required fields 'bucket_name' and 'region' are present".to_string(),
            }
        } else {
            ValidationVerdict::Failed {
                detail: "event is missing 'bucket_name' or 'region'".to_string(),
            }
        }
    }

    fn execute(&mut self) -> String {
        let bucket = self.bucket().to_string();
        let region = self.region().to_string();

        if self.mode.is_dry_run() {
            // One synthesized outcome per adapter call the live path would make.
            self.outcomes.push(
                ProviderOutcome::simulated(
                    BLOCK_PUBLIC_ACCESS_CALL,
                    format!("would apply a public access block to bucket {bucket}"),
                )
                .with_detail("action", "put_public_access_block")
                .with_detail("bucket", bucket.as_str())
                .with_detail("region", region.as_str())
                .with_detail(
                    "would_execute",
                    format!("{BLOCK_PUBLIC_ACCESS_CALL} for {bucket}"),
                ),
            );
            self.outcomes.push(
                ProviderOutcome::simulated(
                    PUT_BUCKET_POLICY_CALL,
                    format!("would apply a restrictive policy to bucket {bucket}"),
                )
                .with_detail("action", "put_bucket_policy")
                .with_detail("bucket", bucket.as_str())
                .with_detail(
                    "would_execute",
                    format!("{PUT_BUCKET_POLICY_CALL} for {bucket}"),
                ),
            );
            return format!(
                "DRY RUN: would restrict public access on bucket '{bucket}' in '{region}'"
            );
        }

        // Call 1: block public access. A raised failure ends the phase; a
        // returned business failure is recorded and the policy call still runs.
        match self.provider.block_public_access(&bucket, &region) {
            Ok(outcome) => self.outcomes.push(outcome),
            Err(err) => {
                self.outcomes.push(ProviderOutcome::from_provider_error(
                    BLOCK_PUBLIC_ACCESS_CALL,
                    &err,
                ));
                return format!("EXCEPTION: {} failure - {err}", err.category());
            }
        }

        // Call 2: tighten the bucket policy.
        let policy = Self::restrictive_policy(&bucket);
        match self.provider.apply_restrictive_policy(&bucket, &policy) {
            Ok(outcome) => self.outcomes.push(outcome),
            Err(err) => {
                self.outcomes.push(ProviderOutcome::from_provider_error(
                    PUT_BUCKET_POLICY_CALL,
                    &err,
                ));
                return format!("EXCEPTION: {} failure - {err}", err.category());
            }
        }

        format!("ACTION: restricted public access on bucket '{bucket}'")
    }

    fn report(&self) -> String {
        format!(
            "Report ({}): public access restrictions applied to '{}'",
            self.mode.label(),
            self.bucket()
        )
    }

    fn outcomes(&self) -> &[ProviderOutcome] {
        &self.outcomes
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
