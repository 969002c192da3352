//! The structured result of one (real or simulated) provider call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ProviderError;

/// One provider-call outcome, recorded in call order by the handler that
/// made (or simulated) the call.
///
/// Action-specific fields — user, source, bucket, region, would_execute,
/// error_code, policy_statements — live in `detail` and are flattened into
/// the serialized record, so persisted outcomes read like the provider's
/// own response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderOutcome {
    /// Business-logic success flag. `false` here is a returned failure,
    /// not a raised one.
    pub success: bool,
    /// Human-readable description of what happened (or would happen).
    pub message: String,
    /// Wall-clock time the outcome was produced (UTC).
    pub timestamp: DateTime<Utc>,
    /// The provider API call this outcome belongs to,
    /// e.g. `slack.admin.users.remove`.
    pub api_call: String,
    /// True when the call was synthesized in dry-run mode.
    #[serde(default)]
    pub dry_run: bool,
    /// Failure classification tag, present only for converted
    /// infrastructure failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Action-specific fields, flattened into the serialized form.
    #[serde(flatten)]
    pub detail: Map<String, Value>,
}

impl ProviderOutcome {
    /// A successful real call.
    pub fn success(api_call: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            timestamp: Utc::now(),
            api_call: api_call.into(),
            dry_run: false,
            error_type: None,
            detail: Map::new(),
        }
    }

    /// A returned business-logic failure (the call completed, the provider
    /// said no).
    pub fn failure(api_call: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            timestamp: Utc::now(),
            api_call: api_call.into(),
            dry_run: false,
            error_type: None,
            detail: Map::new(),
        }
    }

    /// A synthesized dry-run outcome describing the call that would occur.
    pub fn simulated(api_call: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            timestamp: Utc::now(),
            api_call: api_call.into(),
            dry_run: true,
            error_type: None,
            detail: Map::new(),
        }
    }

    /// Convert a raised infrastructure failure into a recorded outcome.
    ///
    /// This is the handler's catch-and-convert site: the raised error
    /// becomes `{success: false, message, error_type}` and never propagates
    /// past `execute()`.
    pub fn from_provider_error(api_call: impl Into<String>, err: &ProviderError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
            timestamp: Utc::now(),
            api_call: api_call.into(),
            dry_run: false,
            error_type: Some(err.error_type().to_string()),
            detail: Map::new(),
        }
    }

    /// Attach an action-specific field.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.detail.insert(key.into(), value.into());
        self
    }
}
