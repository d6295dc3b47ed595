//! Nullable infrastructure for deterministic testing.
//!
//! All external collaborators (ledger, caller identity) are abstracted behind
//! traits. This crate provides test-friendly implementations that:
//! - Keep everything in memory
//! - Can be controlled programmatically (switch callers, inject write failures)
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod identity;
pub mod ledger;

pub use identity::NullIdentity;
pub use ledger::NullLedger;
