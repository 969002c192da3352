//! Handler for unauthorized access to SaaS applications.
//!
//! Requires `user` and `source` fields. Live mode makes one provider call —
//! revoke the user's access to the source workspace. A returned
//! `success: false` outcome is recorded and surfaces as a `FAILED` report
//! line while the dispatch status stays `processed`; a raised failure is
//! caught here and converted to an outcome plus an `EXCEPTION` narrative.

use std::sync::Arc;

use quell_contracts::{
    event::Event,
    mode::Mode,
    outcome::ProviderOutcome,
    result::ValidationVerdict,
};
use quell_core::traits::{RemediationHandler, SaasProvider};

/// The API call this handler simulates or performs.
const REVOKE_ACCESS_CALL: &str = "slack.admin.users.remove";

/// Remediates unauthorized SaaS access by revoking the offending user.
pub struct SaasAccessHandler {
    event: Event,
    mode: Mode,
    provider: Arc<dyn SaasProvider>,
    outcomes: Vec<ProviderOutcome>,
}

impl SaasAccessHandler {
    /// One instance per dispatched event; `mode` is the dispatcher's mode
    /// at creation time and never changes for this instance.
    pub fn new(event: &Event, mode: Mode, provider: Arc<dyn SaasProvider>) -> Self {
        Self {
            event: event.clone(),
            mode,
            provider,
            outcomes: Vec::new(),
        }
    }

    fn user(&self) -> &str {
        self.event.field("user").unwrap_or("unknown")
    }

    fn source(&self) -> &str {
        self.event.field("source").unwrap_or("unknown")
    }
}

impl RemediationHandler for SaasAccessHandler {
    fn name(&self) -> &'static str {
        "SaasAccessHandler"
    }

    fn validate(&self) -> ValidationVerdict {
        if self.event.field("user").is_some() && self.event.field("source").is_some() {
            ValidationVerdict::Success {
                detail: "required fields 'user' and 'source' are present".to_string(),
            }
        } else {
            ValidationVerdict::Failed {
                detail: "event is missing 'user' or 'source'".to_string(),
            }
        }
    }

    fn execute(&mut self) -> String {
        let user = self.user().to_string();
        let source = self.source().to_string();

        if self.mode.is_dry_run() {
            self.outcomes.push(
                ProviderOutcome::simulated(
                    REVOKE_ACCESS_CALL,
                    format!("would revoke access for {user} in workspace {source}"),
                )
                .with_detail("action", "revoke_access")
                .with_detail("user", user.as_str())
                .with_detail("source", source.as_str())
                .with_detail(
                    "would_execute",
                    format!("{REVOKE_ACCESS_CALL} for {user}"),
                ),
            );
            return format!("DRY RUN: would revoke access for user '{user}' on '{source}'");
        }

        match self.provider.revoke_access(&user, &source) {
            Ok(outcome) => {
                let succeeded = outcome.success;
                let message = outcome.message.clone();
                self.outcomes.push(outcome);
                if succeeded {
                    format!("ACTION: revoked access for user '{user}' on '{source}'")
                } else {
                    format!(
                        "ERROR: could not revoke access for user '{user}' on '{source}': {message}"
                    )
                }
            }
            Err(err) => {
                self.outcomes
                    .push(ProviderOutcome::from_provider_error(REVOKE_ACCESS_CALL, &err));
                format!("EXCEPTION: {} failure - {err}", err.category())
            }
        }
    }

    fn report(&self) -> String {
        let user = self.user();

        // In live mode a business failure on the last call renders FAILED;
        // the dispatch status itself stays `processed`.
        if !self.mode.is_dry_run() {
            if let Some(last) = self.outcomes.last() {
                if !last.success {
                    return format!(
                        "Report ({}): FAILED - remediation did not complete for user '{user}'",
                        self.mode.label()
                    );
                }
            }
        }

        format!(
            "Report ({}): remediation policy applied for user '{user}'",
            self.mode.label()
        )
    }

    fn outcomes(&self) -> &[ProviderOutcome] {
        &self.outcomes
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use quell_contracts::{
        error::ProviderError,
        event::Event,
        mode::Mode,
        outcome::ProviderOutcome,
    };
    use quell_core::traits::{RemediationHandler, SaasProvider};
    use quell_providers::MockSlackApi;

    use super::SaasAccessHandler;

    fn event(body: serde_json::Value) -> Event {
        Event::from_value(body).unwrap()
    }

    fn saas_event(user: &str) -> Event {
        event(json!({
            "type": "unauthorized_saas_access",
            "event_id": "e1",
            "user": user,
            "source": "slack",
        }))
    }

    /// A provider that counts calls, for verifying dry-run never touches it.
    struct CountingProvider {
        calls: Arc<Mutex<u32>>,
    }

    impl SaasProvider for CountingProvider {
        fn revoke_access(
            &self,
            user: &str,
            source: &str,
        ) -> Result<ProviderOutcome, ProviderError> {
            *self.calls.lock().unwrap() += 1;
            Ok(ProviderOutcome::success(
                "slack.admin.users.remove",
                format!("access revoked for {user} in workspace {source}"),
            ))
        }
    }

    #[test]
    fn validate_passes_with_required_fields() {
        let handler =
            SaasAccessHandler::new(&saas_event("a@b.com"), Mode::Live, Arc::new(MockSlackApi));
        assert!(handler.validate().is_success());
    }

    #[test]
    fn validate_fails_on_missing_or_empty_fields() {
        for body in [
            json!({ "type": "unauthorized_saas_access", "event_id": "e1", "user": "a@b.com" }),
            json!({ "type": "unauthorized_saas_access", "event_id": "e1", "source": "slack" }),
            json!({ "type": "unauthorized_saas_access", "event_id": "e1", "user": "", "source": "slack" }),
        ] {
            let handler =
                SaasAccessHandler::new(&event(body), Mode::Live, Arc::new(MockSlackApi));
            let verdict = handler.validate();
            assert!(!verdict.is_success(), "expected Failed for {verdict:?}");
        }
    }

    /// Dry run: zero provider calls, one synthesized outcome flagged dry_run,
    /// narrative starts with DRY RUN.
    #[test]
    fn dry_run_synthesizes_one_outcome_without_calling_provider() {
        let calls = Arc::new(Mutex::new(0));
        let provider = CountingProvider { calls: calls.clone() };
        let mut handler =
            SaasAccessHandler::new(&saas_event("a@b.com"), Mode::DryRun, Arc::new(provider));

        let narrative = handler.execute();

        assert!(narrative.starts_with("DRY RUN"), "got: {narrative}");
        assert_eq!(*calls.lock().unwrap(), 0, "dry run must not call the provider");
        assert_eq!(handler.outcomes().len(), 1);
        assert!(handler.outcomes()[0].dry_run);
        assert_eq!(handler.outcomes()[0].detail["would_execute"],
            "slack.admin.users.remove for a@b.com");

        let report = handler.report();
        assert!(report.contains("Report (DRY RUN)"));
        assert!(!report.contains("FAILED"));
    }

    #[test]
    fn live_success_records_one_outcome() {
        let mut handler =
            SaasAccessHandler::new(&saas_event("a@b.com"), Mode::Live, Arc::new(MockSlackApi));

        let narrative = handler.execute();

        assert!(narrative.contains("ACTION"), "got: {narrative}");
        assert_eq!(handler.outcomes().len(), 1);
        assert!(handler.outcomes()[0].success);
        assert!(!handler.outcomes()[0].dry_run);
        assert!(handler.report().contains("remediation policy applied"));
    }

    /// A business failure is returned, recorded, and surfaces as a FAILED
    /// report line — not as an exception narrative.
    #[test]
    fn live_business_failure_reports_failed() {
        let mut handler = SaasAccessHandler::new(
            &saas_event("fail-user@b.com"),
            Mode::Live,
            Arc::new(MockSlackApi),
        );

        let narrative = handler.execute();

        assert!(narrative.starts_with("ERROR:"), "got: {narrative}");
        assert_eq!(handler.outcomes().len(), 1);
        assert!(!handler.outcomes()[0].success);

        let report = handler.report();
        assert!(report.contains("FAILED"), "got: {report}");
    }

    /// A raised infrastructure failure is caught, converted to a recorded
    /// outcome with an error_type tag, and narrated as an EXCEPTION line.
    #[test]
    fn live_raised_failure_is_caught_and_converted() {
        let mut handler = SaasAccessHandler::new(
            &saas_event("exception@b.com"),
            Mode::Live,
            Arc::new(MockSlackApi),
        );

        let narrative = handler.execute();

        assert!(
            narrative.starts_with("EXCEPTION: Network/Access failure"),
            "got: {narrative}"
        );
        assert_eq!(handler.outcomes().len(), 1);
        assert!(!handler.outcomes()[0].success);
        assert_eq!(handler.outcomes()[0].error_type.as_deref(), Some("network"));
    }

    #[test]
    fn live_authorization_failure_narrates_permission_category() {
        let mut handler = SaasAccessHandler::new(
            &saas_event("unauthorized@b.com"),
            Mode::Live,
            Arc::new(MockSlackApi),
        );

        let narrative = handler.execute();
        assert!(
            narrative.starts_with("EXCEPTION: Permission/Validation failure"),
            "got: {narrative}"
        );
    }

    /// report() tolerates an empty outcome history.
    #[test]
    fn report_with_no_outcomes_is_well_formed() {
        let handler =
            SaasAccessHandler::new(&saas_event("a@b.com"), Mode::Live, Arc::new(MockSlackApi));
        let report = handler.report();
        assert!(report.contains("Report (LIVE)"));
    }
}
