//! SHA-256 hashing for key digests and evidence messages.

use devreg_types::{KeyDigest, PublicKeyPem};
use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of arbitrary data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn sha256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Digest identifying a device key: SHA-256 over the PEM text exactly as submitted.
pub fn key_digest(public_key: &PublicKeyPem) -> KeyDigest {
    KeyDigest::new(sha256(public_key.as_bytes()))
}

/// The byte string an evidence signature covers: `content_hash ‖ uploader ‖ timestamp`.
///
/// No separators and no length prefixes. Changing this invalidates every
/// signature already issued by devices.
pub fn evidence_message(content_hash: &str, uploader: &str, timestamp: &str) -> Vec<u8> {
    let mut msg = Vec::with_capacity(content_hash.len() + uploader.len() + timestamp.len());
    msg.extend_from_slice(content_hash.as_bytes());
    msg.extend_from_slice(uploader.as_bytes());
    msg.extend_from_slice(timestamp.as_bytes());
    msg
}
