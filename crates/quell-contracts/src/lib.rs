//! # quell-contracts
//!
//! Shared types and error contracts for the Quell remediation agent.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions and error types.

pub mod error;
pub mod event;
pub mod mode;
pub mod outcome;
pub mod record;
pub mod result;
