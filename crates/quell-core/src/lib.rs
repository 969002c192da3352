//! # quell-core
//!
//! The dispatch runtime for the Quell remediation agent.
//!
//! This crate provides:
//! - The trait seams (`RemediationHandler`, `HandlerRegistry`, `AuditSink`,
//!   `SaasProvider`, `StorageProvider`)
//! - The [`RemediationAgent`] dispatcher that drives each event through its
//!   validate → execute → report lifecycle and audits every terminal state
//! - The TOML configuration layer ([`config::AgentConfig`])

pub mod agent;
pub mod config;
pub mod traits;

pub use agent::RemediationAgent;
pub use config::{AgentConfig, ModuleConfig, Settings};
