//! Cryptographic primitives for DEVREG.
//!
//! - **RSA-PSS** over a SHA-256 digest for evidence and helper-data signatures
//! - **SHA-256** for device key digests and evidence-set vote ids
//! - PEM key handling (SubjectPublicKeyInfo public keys, PKCS#8 / PKCS#1 private keys)
//!
//! Verification never errors: anything that cannot be decoded simply fails to verify.

pub mod error;
pub mod hash;
pub mod keys;
mod pss;
pub mod sign;

pub use error::CryptoError;
pub use hash::{evidence_message, key_digest, sha256, sha256_multi};
pub use keys::{generate_keypair, public_from_private, DeviceKeyPair, DEFAULT_KEY_BITS};
pub use sign::{sign_evidence, sign_message, verify_evidence, verify_signature};
