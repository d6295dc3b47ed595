//! Public key material as transmitted by devices.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A device public key in PEM form (`-----BEGIN PUBLIC KEY-----`, SubjectPublicKeyInfo).
///
/// The exact text is significant: the key digest is computed over these bytes,
/// so two PEM encodings of the same key are two different registrations.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicKeyPem(String);

impl PublicKeyPem {
    pub fn new(pem: impl Into<String>) -> Self {
        Self(pem.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for PublicKeyPem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKeyPem({} bytes)", self.0.len())
    }
}

impl From<String> for PublicKeyPem {
    fn from(s: String) -> Self {
        Self(s)
    }
}
