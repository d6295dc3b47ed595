//! RSA-PSS message signing and verification.
//!
//! Signatures cover the SHA-256 digest of the message, use MGF1-SHA-256, and
//! travel as lowercase hex. Signing uses a salt as long as the digest;
//! verification accepts any salt length.

use devreg_types::PublicKeyPem;
use rand::rngs::OsRng;
use rsa::pkcs8::DecodePublicKey;
use rsa::{Pss, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use crate::hash::{evidence_message, sha256};
use crate::pss::verify_any_salt;
use crate::CryptoError;

/// Sign a message with a device private key, returning the hex signature.
pub fn sign_message(message: &[u8], private_key: &RsaPrivateKey) -> Result<String, CryptoError> {
    let hashed = sha256(message);
    let sig = private_key
        .sign_with_rng(&mut OsRng, Pss::new::<Sha256>(), &hashed)
        .map_err(|e| CryptoError::Signing(e.to_string()))?;
    Ok(hex::encode(sig))
}

/// Sign the `(content_hash, uploader, timestamp)` triple of a piece of evidence.
pub fn sign_evidence(
    content_hash: &str,
    uploader: &str,
    timestamp: &str,
    private_key: &RsaPrivateKey,
) -> Result<String, CryptoError> {
    sign_message(&evidence_message(content_hash, uploader, timestamp), private_key)
}

/// Verify a hex signature over `message` against a PEM public key.
///
/// Returns `true` only if the key decodes as an RSA SubjectPublicKeyInfo, the
/// signature is valid hex, and the PSS check passes. Every other outcome,
/// including malformed input, is `false`.
pub fn verify_signature(public_key: &PublicKeyPem, message: &[u8], signature_hex: &str) -> bool {
    let Ok(key) = RsaPublicKey::from_public_key_pem(public_key.as_str().trim()) else {
        return false;
    };
    let Ok(sig) = hex::decode(signature_hex) else {
        return false;
    };
    verify_any_salt(&key, &sha256(message), &sig)
}

/// Verify an evidence signature.
pub fn verify_evidence(
    public_key: &PublicKeyPem,
    content_hash: &str,
    uploader: &str,
    timestamp: &str,
    signature_hex: &str,
) -> bool {
    verify_signature(
        public_key,
        &evidence_message(content_hash, uploader, timestamp),
        signature_hex,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{generate_keypair, DeviceKeyPair};
    use std::sync::OnceLock;

    fn device() -> &'static DeviceKeyPair {
        static KEY: OnceLock<DeviceKeyPair> = OnceLock::new();
        KEY.get_or_init(|| generate_keypair(1024).unwrap())
    }

    fn other_device() -> &'static DeviceKeyPair {
        static KEY: OnceLock<DeviceKeyPair> = OnceLock::new();
        KEY.get_or_init(|| generate_keypair(1024).unwrap())
    }

    #[test]
    fn sign_and_verify() {
        let kp = device();
        let msg = b"helper data blob";
        let sig = sign_message(msg, &kp.private).unwrap();
        assert!(verify_signature(&kp.public, msg, &sig));
    }

    #[test]
    fn wrong_message_fails() {
        let kp = device();
        let sig = sign_message(b"correct message", &kp.private).unwrap();
        assert!(!verify_signature(&kp.public, b"wrong message", &sig));
    }

    #[test]
    fn wrong_key_fails() {
        let sig = sign_message(b"test", &device().private).unwrap();
        assert!(!verify_signature(&other_device().public, b"test", &sig));
    }

    #[test]
    fn evidence_fields_are_bound() {
        let kp = device();
        let sig = sign_evidence("QmPhoto1", "alice", "1700000000", &kp.private).unwrap();
        assert!(verify_evidence(&kp.public, "QmPhoto1", "alice", "1700000000", &sig));
        assert!(!verify_evidence(&kp.public, "QmPhoto1", "mallory", "1700000000", &sig));
        assert!(!verify_evidence(&kp.public, "QmPhoto1", "alice", "1700000001", &sig));
    }

    #[test]
    fn evidence_signature_is_over_concatenation() {
        // Shifting a character between fields leaves the concatenation unchanged.
        let kp = device();
        let sig = sign_evidence("QmA", "bob", "42", &kp.private).unwrap();
        assert!(verify_evidence(&kp.public, "QmAb", "ob", "42", &sig));
    }

    #[test]
    fn malformed_hex_fails_closed() {
        let kp = device();
        assert!(!verify_signature(&kp.public, b"test", "not-hex"));
        assert!(!verify_signature(&kp.public, b"test", ""));
        assert!(!verify_signature(&kp.public, b"test", "abcd"));
    }

    #[test]
    fn malformed_key_fails_closed() {
        let kp = device();
        let sig = sign_message(b"test", &kp.private).unwrap();
        assert!(!verify_signature(&PublicKeyPem::new("garbage"), b"test", &sig));
        assert!(!verify_signature(
            &PublicKeyPem::new("-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----\n"),
            b"test",
            &sig
        ));
    }

    fn large_device() -> &'static DeviceKeyPair {
        static KEY: OnceLock<DeviceKeyPair> = OnceLock::new();
        KEY.get_or_init(|| generate_keypair(2048).unwrap())
    }

    fn sign_with_salt(message: &[u8], salt_len: usize) -> String {
        let sig = large_device()
            .private
            .sign_with_rng(&mut OsRng, Pss::new_with_salt::<Sha256>(salt_len), &sha256(message))
            .unwrap();
        hex::encode(sig)
    }

    #[test]
    fn foreign_salt_lengths_verify() {
        // 222 is the maximum for a 2048-bit key, what Go's SignPSS uses by default.
        let msg = evidence_message("QmPhoto1", "alice", "1700000000");
        for salt_len in [20, 32, 64, 222] {
            let sig = sign_with_salt(&msg, salt_len);
            assert!(
                verify_signature(&large_device().public, &msg, &sig),
                "salt length {salt_len}"
            );
        }
    }

    #[test]
    fn foreign_salt_length_still_binds_message() {
        let sig = sign_with_salt(b"helper v1", 222);
        assert!(!verify_signature(&large_device().public, b"helper v2", &sig));
        assert!(!verify_signature(&device().public, b"helper v1", &sig));
    }

    #[test]
    fn empty_message() {
        let kp = device();
        let sig = sign_message(b"", &kp.private).unwrap();
        assert!(verify_signature(&kp.public, b"", &sig));
    }
}
