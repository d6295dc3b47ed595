//! Records stored in the ledger, with their wire field names.

use devreg_types::{CallerId, ContentHash, KeyDigest, KeyStatus, PublicKeyPem, VoteId, VoteStatus};
use serde::{Deserialize, Serialize};

/// A device public key and its trust status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceKeyRecord {
    #[serde(rename = "publicKeyHash")]
    pub digest: KeyDigest,
    #[serde(rename = "publicKey")]
    pub public_key: PublicKeyPem,
    pub status: KeyStatus,
}

/// One signed photograph submitted as evidence.
///
/// Also accepts the capitalised field names older clients send.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    #[serde(rename = "ipfsHash", alias = "IPFSHash")]
    pub content_hash: ContentHash,
    /// Hex RSA-PSS signature over `content_hash ‖ uploader ‖ timestamp`.
    #[serde(alias = "Signature")]
    pub signature: String,
    #[serde(rename = "uploadedBy", alias = "UploadedBy")]
    pub uploader: String,
    #[serde(alias = "TimeStamp")]
    pub timestamp: String,
    #[serde(default, alias = "Description")]
    pub description: String,
}

/// Running ballot counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tally {
    pub vote_count: u32,
    pub valid_votes: u32,
    pub invalid_votes: u32,
}

impl Tally {
    pub fn record(&mut self, is_valid: bool) {
        self.vote_count += 1;
        if is_valid {
            self.valid_votes += 1;
        } else {
            self.invalid_votes += 1;
        }
    }
}

/// A vote over the evidence submitted for one device key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    #[serde(rename = "voteId")]
    pub vote_id: VoteId,
    #[serde(rename = "photoIPFSHashes")]
    pub evidence_hashes: Vec<ContentHash>,
    #[serde(flatten)]
    pub tally: Tally,
    pub status: VoteStatus,
    /// Identities that already voted, in ballot order.
    pub voters: Vec<CallerId>,
    #[serde(rename = "devicePublicKey")]
    pub device_key_digest: KeyDigest,
}

impl VoteRecord {
    pub fn has_voted(&self, voter: &CallerId) -> bool {
        self.voters.contains(voter)
    }
}
