//! Composite state keys.
//!
//! A key is `U+0000 namespace U+0000 (part U+0000)*`, the layout permissioned
//! ledgers use for composite keys. Because the separator cannot occur inside a
//! component, two keys are equal only if their namespace and every part are
//! equal, however the component strings overlap.

use std::fmt;

use crate::StoreError;

const SEPARATOR: char = '\u{0}';

/// Record kinds sharing the key space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Namespace {
    DeviceKey,
    Photo,
    PhotoVote,
    HelperData,
}

impl Namespace {
    pub const ALL: [Namespace; 4] = [
        Namespace::DeviceKey,
        Namespace::Photo,
        Namespace::PhotoVote,
        Namespace::HelperData,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeviceKey => "DeviceKey",
            Self::Photo => "Photo",
            Self::PhotoVote => "PhotoVote",
            Self::HelperData => "HelperData",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully composed key into the ledger's key space.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey(String);

impl StateKey {
    /// Compose a key from a namespace and ordered key parts.
    ///
    /// Fails if any part contains the U+0000 separator.
    pub fn composite(namespace: Namespace, parts: &[&str]) -> Result<Self, StoreError> {
        let mut key = String::with_capacity(
            2 + namespace.as_str().len() + parts.iter().map(|p| p.len() + 1).sum::<usize>(),
        );
        key.push(SEPARATOR);
        key.push_str(namespace.as_str());
        key.push(SEPARATOR);
        for part in parts {
            if part.contains(SEPARATOR) {
                return Err(StoreError::InvalidKey(format!(
                    "{namespace} key part {part:?} contains U+0000"
                )));
            }
            key.push_str(part);
            key.push(SEPARATOR);
        }
        Ok(Self(key))
    }

    /// Raw key bytes as handed to a backend.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Rebuild a key from raw backend bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        let s = std::str::from_utf8(bytes)
            .map_err(|e| StoreError::Corruption(format!("non-UTF-8 state key: {e}")))?;
        if !s.starts_with(SEPARATOR) || !s.ends_with(SEPARATOR) || s.len() < 2 {
            return Err(StoreError::Corruption(format!("malformed state key {s:?}")));
        }
        Ok(Self(s.to_string()))
    }

    /// The namespace component.
    pub fn namespace_str(&self) -> &str {
        self.components().next().unwrap_or_default()
    }

    /// Key parts following the namespace.
    pub fn parts(&self) -> Vec<&str> {
        self.components().skip(1).collect()
    }

    fn components(&self) -> impl Iterator<Item = &str> {
        let inner = &self.0[1..self.0.len() - 1];
        inner.split(SEPARATOR)
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.namespace_str())?;
        for part in self.parts() {
            write!(f, "/{part}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateKey({self})")
    }
}
