//! Buffered ledger transactions.
//!
//! ```ignore
//! let mut txn = LedgerTxn::begin(&*ledger);
//! txn.put(&key, &bytes);
//! assert_eq!(txn.get(&key)?, Some(bytes));   // read-your-writes
//! txn.commit()?;
//! ```
//!
//! Nothing reaches the ledger until [`LedgerTxn::commit`]. Dropping the
//! transaction, including on an early `?` return, discards every staged write.
//!
//! The first read of each key is remembered and later reads of it return the
//! same value, so one transaction sees one snapshot. The backend refuses the
//! commit with [`StoreError::Conflict`] if any remembered value has changed.

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::{Ledger, StateKey, StoreError};

/// A set of staged writes layered over a ledger.
pub struct LedgerTxn<'a> {
    ledger: &'a dyn Ledger,
    reads: RefCell<BTreeMap<StateKey, Option<Vec<u8>>>>,
    writes: BTreeMap<StateKey, Vec<u8>>,
}

impl<'a> LedgerTxn<'a> {
    /// Begin a new transaction over `ledger`.
    pub fn begin(ledger: &'a dyn Ledger) -> Self {
        Self {
            ledger,
            reads: RefCell::new(BTreeMap::new()),
            writes: BTreeMap::new(),
        }
    }

    /// Read a key, preferring this transaction's own staged write.
    pub fn get(&self, key: &StateKey) -> Result<Option<Vec<u8>>, StoreError> {
        if let Some(staged) = self.writes.get(key) {
            return Ok(Some(staged.clone()));
        }
        if let Some(seen) = self.reads.borrow().get(key) {
            return Ok(seen.clone());
        }
        let value = self.ledger.get(key)?;
        self.reads.borrow_mut().insert(key.clone(), value.clone());
        Ok(value)
    }

    pub fn exists(&self, key: &StateKey) -> Result<bool, StoreError> {
        if self.writes.contains_key(key) {
            return Ok(true);
        }
        self.get(key).map(|v| v.is_some())
    }

    /// Stage a write. A later write to the same key replaces it.
    pub fn put(&mut self, key: &StateKey, value: Vec<u8>) {
        self.writes.insert(key.clone(), value);
    }

    /// Number of distinct keys staged so far.
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    /// Hand the read set and every staged write to the ledger in one commit.
    pub fn commit(self) -> Result<(), StoreError> {
        if self.writes.is_empty() {
            return Ok(());
        }
        let reads: Vec<_> = self.reads.into_inner().into_iter().collect();
        let count = self.writes.len();
        self.ledger
            .commit(&reads, self.writes.into_iter().collect())?;
        tracing::trace!(reads = reads.len(), writes = count, "ledger transaction committed");
        Ok(())
    }
}
