//! LMDB implementation of [`Ledger`].
//!
//! Each `put` and each `commit` is its own LMDB write transaction, so a commit
//! lands completely or not at all. LMDB admits one writer at a time across
//! every process sharing the directory, and `commit` re-reads the
//! transaction's read set inside that writer before applying anything.

use std::path::Path;

use devreg_store::{ensure_unchanged, Ledger, ObservedRead, StateKey, StoreError};

use crate::environment::{LmdbEnvironment, DEFAULT_MAP_SIZE};
use crate::LmdbError;

pub struct LmdbLedger {
    env: LmdbEnvironment,
}

impl LmdbLedger {
    /// Open the ledger stored under `path` with the default map size.
    pub fn open(path: &Path) -> Result<Self, LmdbError> {
        Self::open_with_map_size(path, DEFAULT_MAP_SIZE)
    }

    pub fn open_with_map_size(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        Ok(Self {
            env: LmdbEnvironment::open(path, map_size)?,
        })
    }

    pub fn environment(&self) -> &LmdbEnvironment {
        &self.env
    }

    /// Number of records across all namespaces.
    pub fn record_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.env().read_txn().map_err(LmdbError::from)?;
        let len = self
            .env
            .state_db()
            .len(&rtxn)
            .map_err(LmdbError::from)?;
        Ok(len)
    }
}

impl Ledger for LmdbLedger {
    fn get(&self, key: &StateKey) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.env().read_txn().map_err(LmdbError::from)?;
        let val = self
            .env
            .state_db()
            .get(&rtxn, key.as_bytes())
            .map_err(LmdbError::from)?;
        Ok(val.map(|v| v.to_vec()))
    }

    fn put(&self, key: &StateKey, value: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.env().write_txn().map_err(LmdbError::from)?;
        self.env
            .state_db()
            .put(&mut wtxn, key.as_bytes(), value)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn commit(
        &self,
        reads: &[ObservedRead],
        writes: Vec<(StateKey, Vec<u8>)>,
    ) -> Result<(), StoreError> {
        let db = self.env.state_db();
        let mut wtxn = self.env.env().write_txn().map_err(LmdbError::from)?;
        for (key, expected) in reads {
            let current = db.get(&wtxn, key.as_bytes()).map_err(LmdbError::from)?;
            if let Err(conflict) = ensure_unchanged(key, expected.as_deref(), current) {
                tracing::debug!(key = %key, "LMDB commit refused, read set is stale");
                return Err(conflict);
            }
        }
        for (key, value) in &writes {
            // An error here drops `wtxn`, aborting the whole batch.
            db.put(&mut wtxn, key.as_bytes(), value)
                .map_err(LmdbError::from)?;
        }
        wtxn.commit().map_err(LmdbError::from)?;
        tracing::debug!(writes = writes.len(), "LMDB batch committed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devreg_store::{LedgerTxn, Namespace};

    fn key(ns: Namespace, part: &str) -> StateKey {
        StateKey::composite(ns, &[part]).unwrap()
    }

    #[test]
    fn put_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = LmdbLedger::open(dir.path()).unwrap();
        let k = key(Namespace::HelperData, "alice");
        assert_eq!(ledger.get(&k).unwrap(), None);
        ledger.put(&k, b"blob").unwrap();
        assert_eq!(ledger.get(&k).unwrap(), Some(b"blob".to_vec()));
    }

    #[test]
    fn namespaces_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = LmdbLedger::open(dir.path()).unwrap();
        ledger.put(&key(Namespace::Photo, "x"), b"photo").unwrap();
        assert_eq!(ledger.get(&key(Namespace::PhotoVote, "x")).unwrap(), None);
    }

    #[test]
    fn transaction_commit_is_visible_after_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let ledger = LmdbLedger::open(dir.path()).unwrap();
            let mut txn = LedgerTxn::begin(&ledger);
            txn.put(&key(Namespace::Photo, "a"), b"1".to_vec());
            txn.put(&key(Namespace::Photo, "b"), b"2".to_vec());
            txn.commit().unwrap();
            assert_eq!(ledger.record_count().unwrap(), 2);
        }
        let ledger = LmdbLedger::open(dir.path()).unwrap();
        assert_eq!(
            ledger.get(&key(Namespace::Photo, "b")).unwrap(),
            Some(b"2".to_vec())
        );
    }

    #[test]
    fn dropped_transaction_leaves_no_trace() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = LmdbLedger::open(dir.path()).unwrap();
        {
            let mut txn = LedgerTxn::begin(&ledger);
            txn.put(&key(Namespace::Photo, "a"), b"1".to_vec());
        }
        assert_eq!(ledger.record_count().unwrap(), 0);
    }

    #[test]
    fn second_handle_cannot_overwrite_what_it_did_not_see() {
        let dir = tempfile::tempdir().unwrap();
        let a = LmdbLedger::open(dir.path()).unwrap();
        let b = LmdbLedger::open(dir.path()).unwrap();
        let vote = key(Namespace::PhotoVote, "vote-QmA");
        a.put(&vote, b"tally=0").unwrap();

        let mut txn_a = LedgerTxn::begin(&a);
        let mut txn_b = LedgerTxn::begin(&b);
        assert_eq!(txn_a.get(&vote).unwrap(), Some(b"tally=0".to_vec()));
        assert_eq!(txn_b.get(&vote).unwrap(), Some(b"tally=0".to_vec()));
        txn_a.put(&vote, b"tally=1,voter-a".to_vec());
        txn_b.put(&vote, b"tally=1,voter-b".to_vec());

        txn_a.commit().unwrap();
        assert!(matches!(txn_b.commit(), Err(StoreError::Conflict(_))));
        assert_eq!(b.get(&vote).unwrap(), Some(b"tally=1,voter-a".to_vec()));
    }

    #[test]
    fn concurrent_create_of_one_key_lands_once() {
        let dir = tempfile::tempdir().unwrap();
        let a = LmdbLedger::open(dir.path()).unwrap();
        let b = LmdbLedger::open(dir.path()).unwrap();
        let photo = key(Namespace::Photo, "QmContested");

        let mut txn_a = LedgerTxn::begin(&a);
        let mut txn_b = LedgerTxn::begin(&b);
        assert!(!txn_a.exists(&photo).unwrap());
        assert!(!txn_b.exists(&photo).unwrap());
        txn_a.put(&photo, b"from-a".to_vec());
        txn_b.put(&photo, b"from-b".to_vec());

        txn_a.commit().unwrap();
        assert!(matches!(txn_b.commit(), Err(StoreError::Conflict(_))));
        assert_eq!(a.record_count().unwrap(), 1);
        assert_eq!(a.get(&photo).unwrap(), Some(b"from-a".to_vec()));
    }
}
