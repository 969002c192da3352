//! # quell-handlers
//!
//! The remediation handler variants for the Quell agent, plus the static
//! registry that maps configured event types to them.
//!
//! Two variants exist, sharing the `RemediationHandler` trait from
//! `quell-core`:
//!
//! - [`SaasAccessHandler`] — revokes a user's access to a SaaS workspace
//! - [`StorageVisibilityHandler`] — blocks public access to a storage
//!   bucket and tightens its policy

pub mod registry;
pub mod saas;
pub mod storage;

pub use registry::StaticRegistry;
pub use saas::SaasAccessHandler;
pub use storage::StorageVisibilityHandler;

// ── End-to-end tests ──────────────────────────────────────────────────────────
//
// Full pipeline: real registry, real simulated providers, real structured
// audit sink on disk, driven through the dispatcher.
