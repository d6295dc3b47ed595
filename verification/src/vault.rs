//! Auxiliary data vault: helper-data blobs anchored to a registered device key.

use devreg_crypto::verify_signature;
use devreg_store::{LedgerTxn, Namespace, StateKey};
use devreg_types::KeyDigest;

use crate::{DeviceKeyRegistry, RegistrationError};

const KIND: &str = "helper data";

/// Stores opaque payloads under caller-chosen labels.
///
/// Writing requires a signature over the payload from a registered device
/// key; the key's status does not matter. Reading is unrestricted.
pub struct AuxiliaryDataVault;

impl AuxiliaryDataVault {
    fn key(label: &str) -> Result<StateKey, RegistrationError> {
        if label.is_empty() {
            return Err(RegistrationError::InvalidInput("label must not be empty".into()));
        }
        StateKey::composite(Namespace::HelperData, &[label])
            .map_err(|e| RegistrationError::InvalidInput(e.to_string()))
    }

    /// Stage `payload` under `label`, replacing whatever was there.
    pub fn store(
        &self,
        txn: &mut LedgerTxn<'_>,
        payload: &[u8],
        key_digest: &KeyDigest,
        signature_hex: &str,
        label: &str,
    ) -> Result<(), RegistrationError> {
        let key = Self::key(label)?;
        let device = DeviceKeyRegistry.get(txn, key_digest)?;

        if !verify_signature(&device.public_key, payload, signature_hex) {
            tracing::warn!(key_digest = %key_digest, label, "rejecting helper data with invalid signature");
            return Err(RegistrationError::InvalidSignature(format!(
                "helper data signed by {key_digest}"
            )));
        }

        txn.put(&key, payload.to_vec());
        tracing::info!(key_digest = %key_digest, label, bytes = payload.len(), "helper data stored");
        Ok(())
    }

    pub fn retrieve(&self, txn: &LedgerTxn<'_>, label: &str) -> Result<Vec<u8>, RegistrationError> {
        txn.get(&Self::key(label)?)?
            .ok_or_else(|| RegistrationError::not_found(KIND, label))
    }
}
