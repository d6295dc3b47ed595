//! Status enums for device keys and photo votes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trust status of a registered device key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyStatus {
    /// Registered through a vote that has not been approved yet.
    Unverified,
    /// A vote over the key's evidence was approved. Never reverts.
    Verified,
}

impl KeyStatus {
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified)
    }
}

impl fmt::Display for KeyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unverified => "UNVERIFIED",
            Self::Verified => "VERIFIED",
        })
    }
}

/// Lifecycle of a photo vote. `Approved` and `Rejected` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoteStatus {
    Pending,
    Approved,
    Rejected,
}

impl VoteStatus {
    /// Whether ballots are still accepted.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for VoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        })
    }
}
