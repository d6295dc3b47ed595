//! Photo voting: the state machine that turns evidence into a trust decision.
//!
//! `PENDING → APPROVED | REJECTED`. Terminal states accept no further ballots.
//! Approval promotes the governed device key to `VERIFIED`.

use devreg_crypto::sha256_multi;
use devreg_store::{LedgerTxn, Namespace, StateKey};
use devreg_types::{
    CallerId, IdentitySource, KeyDigest, PublicKeyPem, RegistryParams, VoteId, VoteIdDerivation,
    VoteStatus,
};

use crate::codec::{read_record, write_record};
use crate::rules::{rule_for, DecisionRule};
use crate::{
    DeviceKeyRegistry, EvidenceRecord, EvidenceStore, RegistrationError, Tally, VoteRecord,
};

const KIND: &str = "vote";

/// Engine for creating photo votes and casting ballots on them.
pub struct VoteEngine {
    rule: Box<dyn DecisionRule>,
    vote_id: VoteIdDerivation,
}

impl VoteEngine {
    pub fn new(rule: Box<dyn DecisionRule>, vote_id: VoteIdDerivation) -> Self {
        Self { rule, vote_id }
    }

    pub fn from_params(params: &RegistryParams) -> Self {
        Self::new(rule_for(params), params.vote_id)
    }

    fn key(vote_id: &VoteId) -> Result<StateKey, RegistrationError> {
        vote_id
            .validate()
            .map_err(|e| RegistrationError::InvalidInput(format!("vote id: {e}")))?;
        Ok(StateKey::composite(Namespace::PhotoVote, &[vote_id.as_str()])?)
    }

    /// Derive the id of the vote covering `evidence` for `device`.
    ///
    /// With [`VoteIdDerivation::FirstEvidence`] two registrations whose first
    /// photo shares a hash map to the same id.
    pub fn derive_vote_id(&self, device: &KeyDigest, evidence: &[EvidenceRecord]) -> VoteId {
        match self.vote_id {
            VoteIdDerivation::FirstEvidence => {
                VoteId::with_suffix(evidence.first().map(|e| e.content_hash.as_str()).unwrap_or(""))
            }
            VoteIdDerivation::EvidenceSet => {
                let mut parts: Vec<&[u8]> = vec![device.as_bytes()];
                for item in evidence {
                    parts.push(&[0u8]);
                    parts.push(item.content_hash.as_str().as_bytes());
                }
                VoteId::with_suffix(&hex::encode(sha256_multi(&parts)))
            }
        }
    }

    /// Open a vote over `evidence` submitted for `device_public_key`.
    ///
    /// Registers the key as `UNVERIFIED`, then for each item in order checks
    /// its signature and stores it. The first failure aborts the operation;
    /// since everything is staged in `txn`, nothing reaches the ledger.
    pub fn start_vote(
        &self,
        txn: &mut LedgerTxn<'_>,
        evidence: &[EvidenceRecord],
        device_public_key: &PublicKeyPem,
    ) -> Result<VoteRecord, RegistrationError> {
        if evidence.is_empty() {
            return Err(RegistrationError::InvalidInput(
                "evidence list cannot be empty".into(),
            ));
        }

        let device = DeviceKeyRegistry.register(txn, device_public_key)?;

        let mut hashes = Vec::with_capacity(evidence.len());
        for item in evidence {
            if !item.is_signed_by(device_public_key) {
                tracing::warn!(
                    content_hash = %item.content_hash,
                    key_digest = %device,
                    "rejecting evidence with invalid signature"
                );
                return Err(RegistrationError::InvalidSignature(format!(
                    "photo with hash {}",
                    item.content_hash
                )));
            }
            EvidenceStore.put(txn, item).map_err(|e| match e {
                RegistrationError::AlreadyExists { key, .. } => {
                    RegistrationError::DuplicateEvidence(key)
                }
                other => other,
            })?;
            hashes.push(item.content_hash.clone());
        }

        let vote_id = self.derive_vote_id(&device, evidence);
        let key = Self::key(&vote_id)?;
        if txn.exists(&key)? {
            return Err(RegistrationError::already_exists(KIND, &vote_id));
        }

        let vote = VoteRecord {
            vote_id,
            evidence_hashes: hashes,
            tally: Tally::default(),
            status: VoteStatus::Pending,
            voters: Vec::new(),
            device_key_digest: device,
        };
        write_record(txn, &key, &vote)?;
        tracing::info!(
            vote_id = %vote.vote_id,
            key_digest = %device,
            photos = vote.evidence_hashes.len(),
            "photo vote opened"
        );
        Ok(vote)
    }

    /// Cast the current caller's ballot on `vote_id` and apply the decision rule.
    ///
    /// Returns the vote's status after the ballot.
    pub fn cast_ballot(
        &self,
        txn: &mut LedgerTxn<'_>,
        identity: &dyn IdentitySource,
        vote_id: &VoteId,
        is_valid: bool,
    ) -> Result<VoteStatus, RegistrationError> {
        let key = Self::key(vote_id)?;
        let mut vote: VoteRecord =
            read_record(txn, &key)?.ok_or_else(|| RegistrationError::not_found(KIND, vote_id))?;

        if !vote.status.is_open() {
            return Err(RegistrationError::VotingClosed {
                vote_id: vote_id.to_string(),
                status: vote.status,
            });
        }

        let voter: CallerId = identity.current_caller_id()?;
        if vote.has_voted(&voter) {
            return Err(RegistrationError::DuplicateVote {
                vote_id: vote_id.to_string(),
                voter: voter.to_string(),
            });
        }

        vote.tally.record(is_valid);
        vote.voters.push(voter);

        if let Some(outcome) = self.rule.decide(&vote.tally) {
            vote.status = outcome;
            if outcome == VoteStatus::Approved {
                DeviceKeyRegistry.mark_verified(txn, &vote.device_key_digest)?;
            }
            tracing::info!(
                vote_id = %vote_id,
                status = %outcome,
                valid = vote.tally.valid_votes,
                invalid = vote.tally.invalid_votes,
                rule = self.rule.name(),
                "photo vote closed"
            );
        } else {
            tracing::debug!(
                vote_id = %vote_id,
                valid = vote.tally.valid_votes,
                invalid = vote.tally.invalid_votes,
                "ballot recorded, vote still pending"
            );
        }

        write_record(txn, &key, &vote)?;
        Ok(vote.status)
    }

    pub fn get_vote(
        &self,
        txn: &LedgerTxn<'_>,
        vote_id: &VoteId,
    ) -> Result<VoteRecord, RegistrationError> {
        read_record(txn, &Self::key(vote_id)?)?.ok_or_else(|| RegistrationError::not_found(KIND, vote_id))
    }
}

impl Default for VoteEngine {
    fn default() -> Self {
        Self::from_params(&RegistryParams::default())
    }
}
