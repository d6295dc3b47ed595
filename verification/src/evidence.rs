//! Evidence store: write-once photo records keyed by content hash.

use devreg_crypto::verify_evidence;
use devreg_store::{LedgerTxn, Namespace, StateKey};
use devreg_types::{ContentHash, PublicKeyPem};

use crate::codec::{read_record, write_record};
use crate::{EvidenceRecord, RegistrationError};

const KIND: &str = "photo";

impl EvidenceRecord {
    /// Whether this record's signature was made by the holder of `public_key`.
    pub fn is_signed_by(&self, public_key: &PublicKeyPem) -> bool {
        verify_evidence(
            public_key,
            self.content_hash.as_str(),
            &self.uploader,
            &self.timestamp,
            &self.signature,
        )
    }
}

/// Stores and loads [`EvidenceRecord`]s in the `Photo` namespace.
pub struct EvidenceStore;

impl EvidenceStore {
    fn key(content_hash: &ContentHash) -> Result<StateKey, RegistrationError> {
        content_hash
            .validate()
            .map_err(|e| RegistrationError::InvalidInput(format!("content hash: {e}")))?;
        Ok(StateKey::composite(Namespace::Photo, &[content_hash.as_str()])?)
    }

    /// Stage `record`, refusing to overwrite an existing hash.
    ///
    /// The existence check reads through `txn`, so a hash staged earlier in
    /// the same transaction also counts as existing.
    pub fn put(
        &self,
        txn: &mut LedgerTxn<'_>,
        record: &EvidenceRecord,
    ) -> Result<(), RegistrationError> {
        let key = Self::key(&record.content_hash)?;
        if txn.exists(&key)? {
            return Err(RegistrationError::already_exists(KIND, &record.content_hash));
        }
        write_record(txn, &key, record)
    }

    pub fn get(
        &self,
        txn: &LedgerTxn<'_>,
        content_hash: &ContentHash,
    ) -> Result<EvidenceRecord, RegistrationError> {
        let key = Self::key(content_hash)?;
        read_record(txn, &key)?.ok_or_else(|| RegistrationError::not_found(KIND, content_hash))
    }
}
