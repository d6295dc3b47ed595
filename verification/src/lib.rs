//! Crowd-verified device registration.
//!
//! A device proves control of its key by signing a set of photographs; voters
//! judge the photographs; an approving vote promotes the key from
//! `UNVERIFIED` to `VERIFIED`. Registered keys (verified or not) can then
//! anchor signed helper-data blobs.
//!
//! Components, leaves first:
//! 1. [`EvidenceStore`]: write-once photo evidence keyed by content hash.
//! 2. [`DeviceKeyRegistry`]: device key records keyed by key digest.
//! 3. [`VoteEngine`]: the photo-vote state machine and its [`DecisionRule`].
//! 4. [`AuxiliaryDataVault`]: signature-gated helper data under a label.
//!
//! [`DeviceRegistration`] wires them to a ledger and an identity source and
//! runs every operation as one atomic ledger transaction.

pub mod codec;
pub mod contract;
pub mod device_key;
pub mod error;
pub mod evidence;
pub mod records;
pub mod rules;
#[cfg(test)]
mod test_support;
pub mod vault;
pub mod voting;

pub use contract::DeviceRegistration;
pub use device_key::DeviceKeyRegistry;
pub use error::RegistrationError;
pub use evidence::EvidenceStore;
pub use records::{DeviceKeyRecord, EvidenceRecord, Tally, VoteRecord};
pub use rules::{rule_for, DecisionRule, SimpleMajority, SymmetricMajority};
pub use vault::AuxiliaryDataVault;
pub use voting::VoteEngine;
