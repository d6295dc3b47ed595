//! The device registration service: the public face of the registry.
//!
//! Holds no state of its own: every record lives in the injected ledger.
//! Each operation runs inside one [`LedgerTxn`] that is committed only when
//! the operation succeeds, so a failed call leaves the ledger untouched.
//!
//! Other processes may share the ledger. When one of them commits a value
//! this operation read, the commit is refused and the operation is run again
//! from scratch against the new state.

use std::sync::{Arc, Mutex, PoisonError};

use devreg_store::{Ledger, LedgerTxn, StoreError};
use devreg_types::{
    ContentHash, IdentitySource, KeyDigest, PublicKeyPem, RegistryParams, VoteId, VoteStatus,
};

use crate::{
    AuxiliaryDataVault, DeviceKeyRecord, DeviceKeyRegistry, EvidenceRecord, EvidenceStore,
    RegistrationError, VoteEngine, VoteRecord,
};

/// Runs of one mutating operation before a persistent conflict is reported.
const MAX_COMMIT_ATTEMPTS: u32 = 16;

/// Construct once per process and share it; all methods take `&self`.
pub struct DeviceRegistration {
    ledger: Arc<dyn Ledger>,
    identity: Arc<dyn IdentitySource>,
    engine: VoteEngine,
    /// Serialises mutating operations within this process.
    commit_gate: Mutex<()>,
}

impl DeviceRegistration {
    pub fn new(
        ledger: Arc<dyn Ledger>,
        identity: Arc<dyn IdentitySource>,
        params: &RegistryParams,
    ) -> Self {
        tracing::debug!(
            rule = %params.decision_rule,
            min_ballots = params.min_ballots,
            vote_id = params.vote_id.as_str(),
            "device registration service created"
        );
        Self {
            ledger,
            identity,
            engine: VoteEngine::from_params(params),
            commit_gate: Mutex::new(()),
        }
    }

    /// Run `op` in a fresh transaction and commit its writes if it succeeds.
    ///
    /// A commit refused because the state `op` read went stale reruns `op`.
    fn write<T>(
        &self,
        op: impl Fn(&mut LedgerTxn<'_>) -> Result<T, RegistrationError>,
    ) -> Result<T, RegistrationError> {
        let _gate = self
            .commit_gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut attempt = 1;
        loop {
            let mut txn = LedgerTxn::begin(self.ledger.as_ref());
            let out = op(&mut txn)?;
            match txn.commit() {
                Ok(()) => return Ok(out),
                Err(StoreError::Conflict(key)) if attempt < MAX_COMMIT_ATTEMPTS => {
                    tracing::debug!(attempt, %key, "ledger changed underneath operation, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn read<T>(
        &self,
        op: impl FnOnce(&LedgerTxn<'_>) -> Result<T, RegistrationError>,
    ) -> Result<T, RegistrationError> {
        let txn = LedgerTxn::begin(self.ledger.as_ref());
        op(&txn)
    }

    /// Register `device_public_key` as `UNVERIFIED`, store its signed evidence,
    /// and open a `PENDING` vote over it.
    pub fn start_vote(
        &self,
        evidence: &[EvidenceRecord],
        device_public_key: &PublicKeyPem,
    ) -> Result<VoteRecord, RegistrationError> {
        self.write(|txn| self.engine.start_vote(txn, evidence, device_public_key))
    }

    /// Cast the current caller's ballot. Returns the vote status afterwards.
    pub fn cast_ballot(&self, vote_id: &VoteId, is_valid: bool) -> Result<VoteStatus, RegistrationError> {
        self.write(|txn| {
            self.engine
                .cast_ballot(txn, self.identity.as_ref(), vote_id, is_valid)
        })
    }

    pub fn get_vote(&self, vote_id: &VoteId) -> Result<VoteRecord, RegistrationError> {
        self.read(|txn| self.engine.get_vote(txn, vote_id))
    }

    pub fn get_evidence(&self, content_hash: &ContentHash) -> Result<EvidenceRecord, RegistrationError> {
        self.read(|txn| EvidenceStore.get(txn, content_hash))
    }

    pub fn get_device_key(&self, digest: &KeyDigest) -> Result<DeviceKeyRecord, RegistrationError> {
        self.read(|txn| DeviceKeyRegistry.get(txn, digest))
    }

    /// Store `payload` under `label` if `signature_hex` over it verifies
    /// against the registered key `key_digest`.
    pub fn store_auxiliary_data(
        &self,
        payload: &[u8],
        key_digest: &KeyDigest,
        signature_hex: &str,
        label: &str,
    ) -> Result<(), RegistrationError> {
        self.write(|txn| AuxiliaryDataVault.store(txn, payload, key_digest, signature_hex, label))
    }

    pub fn retrieve_auxiliary_data(&self, label: &str) -> Result<Vec<u8>, RegistrationError> {
        self.read(|txn| AuxiliaryDataVault.retrieve(txn, label))
    }
}
