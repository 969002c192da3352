//! Error types for the Quell remediation pipeline.
//!
//! Two distinct taxonomies live here:
//!
//! - [`QuellError`] — runtime errors of the agent itself (configuration,
//!   audit persistence, malformed input). These flow through `QuellResult`.
//! - [`ProviderError`] — infrastructure failures raised by a provider
//!   adapter during a remediation call. Handlers catch these inside
//!   `execute()` and convert them to recorded outcomes; they never reach
//!   the dispatcher.

use thiserror::Error;

/// The unified error type for the Quell runtime.
#[derive(Debug, Error)]
pub enum QuellError {
    /// A required configuration value is missing, unreadable, or invalid.
    ///
    /// This is the only unrecoverable category — the hosting binary
    /// terminates with a non-zero exit code when configuration fails
    /// at startup.
    #[error("configuration error: {reason}")]
    Config { reason: String },

    /// The audit sink could not persist a dispatch record.
    ///
    /// The dispatcher catches this at its own boundary: a dispatch whose
    /// record cannot be persisted still returns its result unchanged.
    #[error("audit write failed: {reason}")]
    AuditWriteFailed { reason: String },

    /// An inbound event body was not a JSON object.
    #[error("malformed event: {reason}")]
    MalformedEvent { reason: String },
}

/// Convenience alias used throughout the Quell crates.
pub type QuellResult<T> = Result<T, QuellError>;

/// An infrastructure failure raised by a provider adapter call.
///
/// These model the exceptional path of an external API: the call never
/// produced a structured outcome at all. A `success: false` outcome is a
/// *business-logic* failure and is returned, not raised.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider endpoint could not be reached (includes timeouts).
    #[error("network failure: {0}")]
    Network(String),

    /// The caller lacks permission for the requested action.
    #[error("authorization failure: {0}")]
    Authorization(String),

    /// The target resource does not exist.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The request was rejected as structurally invalid by the provider.
    #[error("validation failure: {0}")]
    Validation(String),

    /// Anything the adapter could not classify.
    #[error("unexpected provider failure: {0}")]
    Other(String),
}

/// Coarse failure buckets used when narrating a caught provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    /// Connectivity or missing-resource problems.
    NetworkAccess,
    /// Permission or request-validation problems.
    PermissionValidation,
    /// Everything else.
    Unclassified,
}

impl std::fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FailureCategory::NetworkAccess => "Network/Access",
            FailureCategory::PermissionValidation => "Permission/Validation",
            FailureCategory::Unclassified => "Unexpected",
        };
        f.write_str(label)
    }
}

impl ProviderError {
    /// Bucket this failure for the execute-phase narrative line.
    pub fn category(&self) -> FailureCategory {
        match self {
            ProviderError::Network(_) | ProviderError::NotFound(_) => {
                FailureCategory::NetworkAccess
            }
            ProviderError::Authorization(_) | ProviderError::Validation(_) => {
                FailureCategory::PermissionValidation
            }
            ProviderError::Other(_) => FailureCategory::Unclassified,
        }
    }

    /// Stable machine-readable tag recorded in the converted outcome.
    pub fn error_type(&self) -> &'static str {
        match self {
            ProviderError::Network(_) => "network",
            ProviderError::Authorization(_) => "authorization",
            ProviderError::NotFound(_) => "not_found",
            ProviderError::Validation(_) => "validation",
            ProviderError::Other(_) => "other",
        }
    }
}
