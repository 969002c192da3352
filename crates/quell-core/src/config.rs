//! TOML-driven agent configuration.
//!
//! The configuration maps event types to handler variant names and carries
//! the runtime settings (initial mode, audit format, audit file path).
//! Missing or unparsable configuration at startup is fatal — the hosting
//! binary exits non-zero. This is the only place fatal-on-startup behavior
//! is correct; every later failure is converted to a typed result.
//!
//! ```toml
//! [modules.unauthorized_saas_access]
//! class = "SaasAccessHandler"
//!
//! [modules.open_s3_bucket]
//! class = "StorageVisibilityHandler"
//!
//! [settings]
//! dry_run_mode = true
//! audit_format = "markdown"
//! audit_file = "logs/audit_trail.md"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use quell_contracts::{
    error::{QuellError, QuellResult},
    mode::Mode,
    record::AuditFormat,
};

/// One `event_type -> handler class` binding.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleConfig {
    /// Handler variant name, e.g. `"SaasAccessHandler"`. Unknown names are
    /// skipped with a warning when the registry is built — never fatal.
    pub class: String,
}

/// Runtime settings, all defaulted.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dry_run_mode: bool,
    pub audit_format: AuditFormat,
    pub audit_file: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dry_run_mode: false,
            audit_format: AuditFormat::Markdown,
            audit_file: "logs/audit_trail.md".to_string(),
        }
    }
}

impl Settings {
    /// The initial execution mode this configuration selects.
    pub fn initial_mode(&self) -> Mode {
        Mode::from_dry_run_flag(self.dry_run_mode)
    }
}

/// The top-level structure deserialized from the agent's TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Ordered `event_type -> module` bindings.
    #[serde(default)]
    pub modules: BTreeMap<String, ModuleConfig>,
    #[serde(default)]
    pub settings: Settings,
}

impl AgentConfig {
    /// Parse `s` as TOML agent configuration.
    pub fn from_toml_str(s: &str) -> QuellResult<Self> {
        toml::from_str(s).map_err(|e| QuellError::Config {
            reason: format!("failed to parse configuration TOML: {e}"),
        })
    }

    /// Read and parse the configuration file at `path`.
    pub fn from_file(path: &Path) -> QuellResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| QuellError::Config {
            reason: format!("failed to read configuration file '{}': {e}", path.display()),
        })?;
        Self::from_toml_str(&contents)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use quell_contracts::{error::QuellError, mode::Mode, record::AuditFormat};

    use super::AgentConfig;

    #[test]
    fn parses_full_configuration() {
        let toml = r#"
            [modules.unauthorized_saas_access]
            class = "SaasAccessHandler"

            [modules.open_s3_bucket]
            class = "StorageVisibilityHandler"

            [settings]
            dry_run_mode = true
            audit_format = "json"
            audit_file = "logs/audit_trail.json"
        "#;

        let config = AgentConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.modules.len(), 2);
        assert_eq!(
            config.modules["unauthorized_saas_access"].class,
            "SaasAccessHandler"
        );
        assert_eq!(config.settings.initial_mode(), Mode::DryRun);
        assert_eq!(config.settings.audit_format, AuditFormat::Json);
        assert_eq!(config.settings.audit_file, "logs/audit_trail.json");
    }

    #[test]
    fn settings_default_when_absent() {
        let config = AgentConfig::from_toml_str("").unwrap();
        assert!(config.modules.is_empty());
        assert_eq!(config.settings.initial_mode(), Mode::Live);
        assert_eq!(config.settings.audit_format, AuditFormat::Markdown);
        assert_eq!(config.settings.audit_file, "logs/audit_trail.md");
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = AgentConfig::from_toml_str("modules = 3").unwrap_err();
        assert!(matches!(err, QuellError::Config { .. }));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err =
            AgentConfig::from_file(std::path::Path::new("/nonexistent/quell.toml")).unwrap_err();
        match err {
            QuellError::Config { reason } => assert!(reason.contains("/nonexistent/quell.toml")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }
}
