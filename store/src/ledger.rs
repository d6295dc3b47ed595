//! The key-value contract every backend provides.

use crate::{StateKey, StoreError};

/// One value a transaction observed: `None` means the key was absent.
pub type ObservedRead = (StateKey, Option<Vec<u8>>);

/// A deterministic key-value state shared by all record kinds.
///
/// Several processes may hold the same ledger open. Consistency comes from
/// [`Ledger::commit`], which applies a transaction's writes only if every
/// value it read is still current.
pub trait Ledger: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent.
    fn get(&self, key: &StateKey) -> Result<Option<Vec<u8>>, StoreError>;

    /// Durably store `value` under `key`, replacing any previous value.
    fn put(&self, key: &StateKey, value: &[u8]) -> Result<(), StoreError>;

    /// Check `reads` against current state, then apply `writes` as one unit.
    ///
    /// Fails with [`StoreError::Conflict`] and writes nothing when any read
    /// value has changed. The default checks and applies one key at a time, so
    /// it is neither atomic nor isolated; real backends override it.
    fn commit(
        &self,
        reads: &[ObservedRead],
        writes: Vec<(StateKey, Vec<u8>)>,
    ) -> Result<(), StoreError> {
        for (key, expected) in reads {
            ensure_unchanged(key, expected.as_deref(), self.get(key)?.as_deref())?;
        }
        for (key, value) in writes {
            self.put(&key, &value)?;
        }
        Ok(())
    }
}

/// Conflict unless `current` still equals what the transaction saw.
pub fn ensure_unchanged(
    key: &StateKey,
    expected: Option<&[u8]>,
    current: Option<&[u8]>,
) -> Result<(), StoreError> {
    if expected == current {
        Ok(())
    } else {
        Err(StoreError::Conflict(key.to_string()))
    }
}
