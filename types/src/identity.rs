//! Caller identity as reported by the membership layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity of whoever invoked an operation.
///
/// Only compared for equality; it never authorises anything by itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerId(String);

impl CallerId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CallerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Supplies the identity of the current caller.
///
/// Implemented by the membership layer of the host; only consulted while
/// casting ballots, and only to stop one identity voting twice.
pub trait IdentitySource: Send + Sync {
    fn current_caller_id(&self) -> Result<CallerId, IdentityError>;
}

/// The membership layer could not say who is calling.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("caller identity unavailable: {0}")]
pub struct IdentityError(pub String);
