//! Nullable ledger: thread-safe in-memory key-value state for testing.

use devreg_store::{ensure_unchanged, Ledger, Namespace, ObservedRead, StateKey, StoreError};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

/// An in-memory ledger. Commits are checked and applied under one lock, so they
/// are atomic and see no interleaved writes.
#[derive(Default)]
pub struct NullLedger {
    state: Mutex<BTreeMap<StateKey, Vec<u8>>>,
    fail_writes: AtomicBool,
    commits: AtomicU64,
}

impl NullLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every `put` and `commit` fails with a backend error and writes nothing.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Copy of the complete state, for before/after comparisons.
    pub fn snapshot(&self) -> BTreeMap<StateKey, Vec<u8>> {
        self.state.lock().unwrap().clone()
    }

    /// Number of records stored in `namespace`.
    pub fn count(&self, namespace: Namespace) -> usize {
        self.state
            .lock()
            .unwrap()
            .keys()
            .filter(|k| k.namespace_str() == namespace.as_str())
            .count()
    }

    /// Number of successful commits so far.
    pub fn commit_count(&self) -> u64 {
        self.commits.load(Ordering::SeqCst)
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected write failure".into()));
        }
        Ok(())
    }
}

impl Ledger for NullLedger {
    fn get(&self, key: &StateKey) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.state.lock().unwrap().get(key).cloned())
    }

    fn put(&self, key: &StateKey, value: &[u8]) -> Result<(), StoreError> {
        self.check_writable()?;
        self.state
            .lock()
            .unwrap()
            .insert(key.clone(), value.to_vec());
        Ok(())
    }

    fn commit(
        &self,
        reads: &[ObservedRead],
        writes: Vec<(StateKey, Vec<u8>)>,
    ) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut state = self.state.lock().unwrap();
        for (key, expected) in reads {
            ensure_unchanged(key, expected.as_deref(), state.get(key).map(Vec::as_slice))?;
        }
        state.extend(writes);
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
