//! Digest and identifier types for device keys, evidence, and votes.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::TypeError;

/// A 32-byte SHA-256 digest of a device's PEM-encoded public key.
///
/// Rendered everywhere (storage keys, JSON, CLI) as 64 lowercase hex characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyDigest([u8; 32]);

impl KeyDigest {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for KeyDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyDigest({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for KeyDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for KeyDigest {
    type Err = TypeError;

    /// Only the canonical lowercase form parses, so each key has one spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.bytes().any(|b| b.is_ascii_uppercase()) {
            return Err(TypeError::InvalidDigest(format!("{s}: expected lowercase hex")));
        }
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidDigest(format!("{s}: {e}")))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| TypeError::InvalidDigest(format!("{s}: expected 32 bytes")))?;
        Ok(Self(arr))
    }
}

impl Serialize for KeyDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for KeyDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Checks shared by every string identifier used as a storage key part.
fn validate_identifier(s: &str) -> Result<(), TypeError> {
    if s.is_empty() {
        return Err(TypeError::EmptyIdentifier);
    }
    if s.contains('\u{0}') {
        return Err(TypeError::NulInIdentifier(s.to_string()));
    }
    Ok(())
}

/// Content-addressed identifier of a piece of evidence (e.g. an IPFS CID).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this hash is usable as a storage key part.
    pub fn validate(&self) -> Result<(), TypeError> {
        validate_identifier(&self.0)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentHash {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Identifier of a photo vote.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteId(String);

impl VoteId {
    /// Prefix carried by every derived vote id.
    pub const PREFIX: &'static str = "vote-";

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// `vote-<suffix>`.
    pub fn with_suffix(suffix: &str) -> Self {
        Self(format!("{}{}", Self::PREFIX, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn validate(&self) -> Result<(), TypeError> {
        validate_identifier(&self.0)
    }
}

impl fmt::Display for VoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VoteId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
