//! JSON encoding of records at the ledger boundary.

use devreg_store::{LedgerTxn, StateKey};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::RegistrationError;

/// Read and decode the record under `key`, if any.
pub fn read_record<T: DeserializeOwned>(
    txn: &LedgerTxn<'_>,
    key: &StateKey,
) -> Result<Option<T>, RegistrationError> {
    match txn.get(key)? {
        Some(bytes) => serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| RegistrationError::Serialization(format!("{key}: {e}"))),
        None => Ok(None),
    }
}

/// Encode `record` and stage it under `key`.
pub fn write_record<T: Serialize>(
    txn: &mut LedgerTxn<'_>,
    key: &StateKey,
    record: &T,
) -> Result<(), RegistrationError> {
    let bytes = serde_json::to_vec(record)
        .map_err(|e| RegistrationError::Serialization(format!("{key}: {e}")))?;
    txn.put(key, bytes);
    Ok(())
}
