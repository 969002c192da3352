//! The static handler registration table.
//!
//! Maps event-type strings to handler constructors, built once from
//! configuration at startup. This is a static table rather than any
//! reflective lookup: the set of handler variants is closed, and an unknown
//! class name in configuration is skipped with a warning, never fatal.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{info, warn};

use quell_contracts::{event::Event, mode::Mode};
use quell_core::{
    config::ModuleConfig,
    traits::{HandlerRegistry, RemediationHandler, SaasProvider, StorageProvider},
};
use quell_providers::{MockS3Api, MockSlackApi};

use crate::{saas::SaasAccessHandler, storage::StorageVisibilityHandler};

/// The closed set of handler variants a configuration can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HandlerKind {
    SaasAccess,
    StorageVisibility,
}

impl HandlerKind {
    /// Resolve a configured class name, `None` for unknown names.
    fn from_class_name(name: &str) -> Option<Self> {
        match name {
            "SaasAccessHandler" => Some(HandlerKind::SaasAccess),
            "StorageVisibilityHandler" => Some(HandlerKind::StorageVisibility),
            _ => None,
        }
    }
}

/// A `HandlerRegistry` backed by a static `event_type -> variant` table.
///
/// Immutable after construction. Each `create()` call builds a fresh handler
/// instance scoped to one event and the mode captured by the dispatcher.
pub struct StaticRegistry {
    entries: BTreeMap<String, HandlerKind>,
    saas: Arc<dyn SaasProvider>,
    storage: Arc<dyn StorageProvider>,
}

impl StaticRegistry {
    /// Build the registry from the configuration's module map, injecting
    /// the provider implementations handlers will call.
    ///
    /// Unknown class names are logged and skipped — startup proceeds with
    /// whatever bindings resolved.
    pub fn from_config(
        modules: &BTreeMap<String, ModuleConfig>,
        saas: Arc<dyn SaasProvider>,
        storage: Arc<dyn StorageProvider>,
    ) -> Self {
        let mut entries = BTreeMap::new();
        for (event_type, module) in modules {
            match HandlerKind::from_class_name(&module.class) {
                Some(kind) => {
                    info!(event_type = %event_type, class = %module.class, "mapped event type to handler");
                    entries.insert(event_type.clone(), kind);
                }
                None => {
                    warn!(
                        event_type = %event_type,
                        class = %module.class,
                        "unknown handler class in configuration; skipping"
                    );
                }
            }
        }
        Self { entries, saas, storage }
    }

    /// Convenience constructor wiring the shipped simulated providers.
    pub fn with_mock_providers(modules: &BTreeMap<String, ModuleConfig>) -> Self {
        Self::from_config(modules, Arc::new(MockSlackApi), Arc::new(MockS3Api))
    }
}

impl HandlerRegistry for StaticRegistry {
    fn create(
        &self,
        event_type: &str,
        event: &Event,
        mode: Mode,
    ) -> Option<Box<dyn RemediationHandler>> {
        match self.entries.get(event_type)? {
            HandlerKind::SaasAccess => Some(Box::new(SaasAccessHandler::new(
                event,
                mode,
                self.saas.clone(),
            ))),
            HandlerKind::StorageVisibility => Some(Box::new(StorageVisibilityHandler::new(
                event,
                mode,
                self.storage.clone(),
            ))),
        }
    }

    fn event_types(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use quell_contracts::{event::Event, mode::Mode};
    use quell_core::{config::ModuleConfig, traits::HandlerRegistry};

    use super::StaticRegistry;

    fn modules(bindings: &[(&str, &str)]) -> BTreeMap<String, ModuleConfig> {
        bindings
            .iter()
            .map(|(event_type, class)| {
                (event_type.to_string(), ModuleConfig { class: class.to_string() })
            })
            .collect()
    }

    #[test]
    fn creates_handlers_for_configured_types() {
        let registry = StaticRegistry::with_mock_providers(&modules(&[
            ("unauthorized_saas_access", "SaasAccessHandler"),
            ("open_s3_bucket", "StorageVisibilityHandler"),
        ]));

        let event = Event::from_value(json!({ "type": "unauthorized_saas_access" })).unwrap();
        let handler = registry
            .create("unauthorized_saas_access", &event, Mode::Live)
            .expect("handler must exist");
        assert_eq!(handler.name(), "SaasAccessHandler");

        let handler = registry
            .create("open_s3_bucket", &event, Mode::Live)
            .expect("handler must exist");
        assert_eq!(handler.name(), "StorageVisibilityHandler");
    }

    /// Absence of a key is a normal outcome, not an error.
    #[test]
    fn unknown_event_type_yields_none() {
        let registry = StaticRegistry::with_mock_providers(&modules(&[(
            "unauthorized_saas_access",
            "SaasAccessHandler",
        )]));

        let event = Event::from_value(json!({ "type": "other" })).unwrap();
        assert!(registry.create("other", &event, Mode::Live).is_none());
    }

    /// An unknown class name is skipped, never fatal; the rest of the
    /// configuration still resolves.
    #[test]
    fn unknown_class_name_is_skipped() {
        let registry = StaticRegistry::with_mock_providers(&modules(&[
            ("unauthorized_saas_access", "SaasAccessHandler"),
            ("mystery_event", "NoSuchHandler"),
        ]));

        assert_eq!(registry.event_types(), vec!["unauthorized_saas_access".to_string()]);

        let event = Event::from_value(json!({ "type": "mystery_event" })).unwrap();
        assert!(registry.create("mystery_event", &event, Mode::Live).is_none());
    }

    #[test]
    fn event_types_are_sorted() {
        let registry = StaticRegistry::with_mock_providers(&modules(&[
            ("open_s3_bucket", "StorageVisibilityHandler"),
            ("unauthorized_saas_access", "SaasAccessHandler"),
        ]));
        assert_eq!(
            registry.event_types(),
            vec!["open_s3_bucket".to_string(), "unauthorized_saas_access".to_string()]
        );
    }
}
