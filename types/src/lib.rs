//! Fundamental types for DEVREG.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! key digests, evidence and vote identifiers, caller identities, status enums,
//! and the registry parameters that select the voting rules.

pub mod error;
pub mod hash;
pub mod identity;
pub mod keys;
pub mod params;
pub mod state;

pub use error::TypeError;
pub use hash::{ContentHash, KeyDigest, VoteId};
pub use identity::{CallerId, IdentityError, IdentitySource};
pub use keys::PublicKeyPem;
pub use params::{DecisionRuleKind, RegistryParams, VoteIdDerivation};
pub use state::{KeyStatus, VoteStatus};
