//! Simulated Slack admin API.
//!
//! Failure injection is driven by substring markers in the user identifier,
//! so every test path is deterministic:
//!
//! | marker in `user` | behavior                                        |
//! |------------------|-------------------------------------------------|
//! | `exception`      | raises `ProviderError::Network`                 |
//! | `timeout`        | raises `ProviderError::Network` (timeout)       |
//! | `unauthorized`   | raises `ProviderError::Authorization`           |
//! | `fail`           | returns `success: false` (business failure)     |
//! | otherwise        | returns a success outcome                       |
//!
//! A returned `success: false` is a business-logic failure the handler
//! records and reports; a raised error is an infrastructure failure the
//! handler catches and converts.

use tracing::debug;

use quell_contracts::{
    error::ProviderError,
    outcome::ProviderOutcome,
};
use quell_core::traits::SaasProvider;

/// The API call name recorded on every outcome this adapter produces.
pub const REVOKE_ACCESS_CALL: &str = "slack.admin.users.remove";

/// A stateless, deterministic simulation of the Slack admin API.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockSlackApi;

impl MockSlackApi {
    pub fn new() -> Self {
        Self
    }
}

impl SaasProvider for MockSlackApi {
    fn revoke_access(&self, user: &str, source: &str) -> Result<ProviderOutcome, ProviderError> {
        debug!(user, source, "simulating slack access revocation");
        let marker = user.to_lowercase();

        if marker.contains("exception") {
            return Err(ProviderError::Network(format!(
                "network error reaching the Slack admin API for workspace {source}"
            )));
        }
        if marker.contains("timeout") {
            return Err(ProviderError::Network(format!(
                "timed out calling the Slack admin API for user {user}"
            )));
        }
        if marker.contains("unauthorized") {
            return Err(ProviderError::Authorization(format!(
                "insufficient permissions to revoke access for {user}"
            )));
        }

        if marker.contains("fail") {
            return Ok(ProviderOutcome::failure(
                REVOKE_ACCESS_CALL,
                format!("failed to revoke access for {user} in workspace {source}"),
            )
            .with_detail("error_code", "PERMISSION_DENIED")
            .with_detail("user", user)
            .with_detail("source", source));
        }

        Ok(ProviderOutcome::success(
            REVOKE_ACCESS_CALL,
            format!("access revoked for {user} in workspace {source}"),
        )
        .with_detail("user", user)
        .with_detail("source", source))
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use quell_contracts::error::ProviderError;
    use quell_core::traits::SaasProvider;

    use super::{MockSlackApi, REVOKE_ACCESS_CALL};

    #[test]
    fn clean_user_revocation_succeeds() {
        let outcome = MockSlackApi::new().revoke_access("a@b.com", "slack").unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.api_call, REVOKE_ACCESS_CALL);
        assert!(outcome.message.contains("a@b.com"));
        assert_eq!(outcome.detail["source"], "slack");
    }

    #[test]
    fn fail_marker_returns_business_failure() {
        let outcome = MockSlackApi::new()
            .revoke_access("fail-user@b.com", "slack")
            .unwrap();
        assert!(!outcome.success, "a business failure is returned, not raised");
        assert_eq!(outcome.detail["error_code"], "PERMISSION_DENIED");
    }

    #[test]
    fn exception_marker_raises_network_failure() {
        let err = MockSlackApi::new()
            .revoke_access("exception@b.com", "slack")
            .unwrap_err();
        assert!(matches!(err, ProviderError::Network(_)));
    }

    #[test]
    fn timeout_marker_raises_network_failure() {
        let err = MockSlackApi::new()
            .revoke_access("timeout@b.com", "slack")
            .unwrap_err();
        assert!(matches!(err, ProviderError::Network(_)));
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn unauthorized_marker_raises_authorization_failure() {
        let err = MockSlackApi::new()
            .revoke_access("unauthorized@b.com", "slack")
            .unwrap_err();
        assert!(matches!(err, ProviderError::Authorization(_)));
    }

    /// Markers are matched case-insensitively.
    #[test]
    fn markers_are_case_insensitive() {
        let err = MockSlackApi::new()
            .revoke_access("EXCEPTION@b.com", "slack")
            .unwrap_err();
        assert!(matches!(err, ProviderError::Network(_)));
    }
}
