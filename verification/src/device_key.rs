//! Device key registry: key records keyed by the digest of their PEM text.

use devreg_crypto::key_digest;
use devreg_store::{LedgerTxn, Namespace, StateKey};
use devreg_types::{KeyDigest, KeyStatus, PublicKeyPem};

use crate::codec::{read_record, write_record};
use crate::{DeviceKeyRecord, RegistrationError};

const KIND: &str = "device key";

/// Registers device keys and promotes them to `VERIFIED`.
pub struct DeviceKeyRegistry;

impl DeviceKeyRegistry {
    fn key(digest: &KeyDigest) -> Result<StateKey, RegistrationError> {
        Ok(StateKey::composite(Namespace::DeviceKey, &[&digest.to_hex()])?)
    }

    /// Stage an `UNVERIFIED` record for `public_key` and return its digest.
    ///
    /// An existing `UNVERIFIED` record for the same key material is overwritten.
    /// A `VERIFIED` record is left as it is: key status never reverts.
    pub fn register(
        &self,
        txn: &mut LedgerTxn<'_>,
        public_key: &PublicKeyPem,
    ) -> Result<KeyDigest, RegistrationError> {
        if public_key.as_str().trim().is_empty() {
            return Err(RegistrationError::InvalidInput(
                "device public key must not be empty".into(),
            ));
        }
        let digest = key_digest(public_key);
        let key = Self::key(&digest)?;
        if let Some(existing) = read_record::<DeviceKeyRecord>(txn, &key)? {
            if existing.status.is_verified() {
                tracing::debug!(key_digest = %digest, "device key already VERIFIED, kept");
                return Ok(digest);
            }
        }
        let record = DeviceKeyRecord {
            digest,
            public_key: public_key.clone(),
            status: KeyStatus::Unverified,
        };
        write_record(txn, &key, &record)?;
        tracing::debug!(key_digest = %digest, "device key staged as UNVERIFIED");
        Ok(digest)
    }

    pub fn get(
        &self,
        txn: &LedgerTxn<'_>,
        digest: &KeyDigest,
    ) -> Result<DeviceKeyRecord, RegistrationError> {
        read_record(txn, &Self::key(digest)?)?.ok_or_else(|| RegistrationError::not_found(KIND, digest))
    }

    /// Promote the key to `VERIFIED`.
    ///
    /// Returns `false` without writing when it already was verified.
    pub fn mark_verified(
        &self,
        txn: &mut LedgerTxn<'_>,
        digest: &KeyDigest,
    ) -> Result<bool, RegistrationError> {
        let mut record = self.get(txn, digest)?;
        if record.status.is_verified() {
            return Ok(false);
        }
        record.status = KeyStatus::Verified;
        write_record(txn, &Self::key(digest)?, &record)?;
        tracing::info!(key_digest = %digest, "device key VERIFIED");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::device;
    use devreg_nullables::NullLedger;

    #[test]
    fn register_creates_unverified_record() {
        let ledger = NullLedger::new();
        let mut txn = LedgerTxn::begin(&ledger);
        let digest = DeviceKeyRegistry.register(&mut txn, &device().public).unwrap();
        assert_eq!(digest, key_digest(&device().public));
        let record = DeviceKeyRegistry.get(&txn, &digest).unwrap();
        assert_eq!(record.status, KeyStatus::Unverified);
        assert_eq!(record.public_key, device().public);
    }

    #[test]
    fn mark_verified_is_idempotent() {
        let ledger = NullLedger::new();
        let mut txn = LedgerTxn::begin(&ledger);
        let digest = DeviceKeyRegistry.register(&mut txn, &device().public).unwrap();
        assert!(DeviceKeyRegistry.mark_verified(&mut txn, &digest).unwrap());
        assert!(!DeviceKeyRegistry.mark_verified(&mut txn, &digest).unwrap());
        assert_eq!(
            DeviceKeyRegistry.get(&txn, &digest).unwrap().status,
            KeyStatus::Verified
        );
    }

    #[test]
    fn mark_verified_unknown_key_not_found() {
        let ledger = NullLedger::new();
        let mut txn = LedgerTxn::begin(&ledger);
        let err = DeviceKeyRegistry
            .mark_verified(&mut txn, &KeyDigest::new([7u8; 32]))
            .unwrap_err();
        assert!(matches!(err, RegistrationError::NotFound { .. }));
    }

    #[test]
    fn re_registration_keeps_verified_status() {
        let ledger = NullLedger::new();
        let mut txn = LedgerTxn::begin(&ledger);
        let digest = DeviceKeyRegistry.register(&mut txn, &device().public).unwrap();
        DeviceKeyRegistry.mark_verified(&mut txn, &digest).unwrap();
        assert_eq!(
            DeviceKeyRegistry.register(&mut txn, &device().public).unwrap(),
            digest
        );
        assert_eq!(
            DeviceKeyRegistry.get(&txn, &digest).unwrap().status,
            KeyStatus::Verified
        );
    }

    #[test]
    fn empty_key_rejected() {
        let ledger = NullLedger::new();
        let mut txn = LedgerTxn::begin(&ledger);
        assert!(matches!(
            DeviceKeyRegistry
                .register(&mut txn, &PublicKeyPem::new("  "))
                .unwrap_err(),
            RegistrationError::InvalidInput(_)
        ));
    }
}
