//! # quell-providers
//!
//! Simulated provider adapters for the Quell remediation agent.
//!
//! Both adapters are deterministic: failure paths are selected by
//! recognizable markers in the input identifier, never by randomness. They
//! implement the provider traits from `quell-core`, so handlers accept a
//! real client or a test double interchangeably — the handler's
//! failure-handling contract is identical regardless of which is injected.

pub mod s3;
pub mod slack;

pub use s3::MockS3Api;
pub use slack::MockSlackApi;
