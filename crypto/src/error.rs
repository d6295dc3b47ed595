use thiserror::Error;

/// Failures on the signing side. Verification reports a plain `bool` instead.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("failed to decode private key: {0}")]
    PrivateKeyDecode(String),

    #[error("failed to encode key: {0}")]
    KeyEncode(String),

    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    #[error("signing failed: {0}")]
    Signing(String),
}
