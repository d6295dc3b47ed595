//! RSA device key generation and PEM handling.

use devreg_types::PublicKeyPem;
use rand::rngs::OsRng;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::{DecodePrivateKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::CryptoError;

/// Key size used by devices unless told otherwise.
pub const DEFAULT_KEY_BITS: usize = 2048;

/// A device's RSA key pair.
///
/// The public half is kept as PEM text because the registry digests the text,
/// not the key.
pub struct DeviceKeyPair {
    pub private: RsaPrivateKey,
    pub public: PublicKeyPem,
}

impl DeviceKeyPair {
    /// Load a private key from PEM (PKCS#8 `PRIVATE KEY` or PKCS#1 `RSA PRIVATE KEY`).
    pub fn from_private_pem(pem: &str) -> Result<Self, CryptoError> {
        let private = RsaPrivateKey::from_pkcs8_pem(pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
            .map_err(|e| CryptoError::PrivateKeyDecode(e.to_string()))?;
        let public = public_from_private(&private)?;
        Ok(Self { private, public })
    }

    /// PKCS#8 PEM of the private key.
    pub fn private_pem(&self) -> Result<String, CryptoError> {
        self.private
            .to_pkcs8_pem(LineEnding::LF)
            .map(|pem| pem.to_string())
            .map_err(|e| CryptoError::KeyEncode(e.to_string()))
    }
}

/// Generate a new RSA key pair of `bits` from the OS random source.
pub fn generate_keypair(bits: usize) -> Result<DeviceKeyPair, CryptoError> {
    let private = RsaPrivateKey::new(&mut OsRng, bits)
        .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;
    let public = public_from_private(&private)?;
    Ok(DeviceKeyPair { private, public })
}

/// SubjectPublicKeyInfo PEM (`-----BEGIN PUBLIC KEY-----`) for a private key.
pub fn public_from_private(private: &RsaPrivateKey) -> Result<PublicKeyPem, CryptoError> {
    RsaPublicKey::from(private)
        .to_public_key_pem(LineEnding::LF)
        .map(PublicKeyPem::new)
        .map_err(|e| CryptoError::KeyEncode(e.to_string()))
}
