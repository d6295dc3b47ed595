//! Concurrent callers sharing one service and one ledger.

mod common;

use std::cell::RefCell;
use std::sync::Arc;
use std::thread;

use common::{device, evidence};
use devreg_nullables::NullLedger;
use devreg_store::Namespace;
use devreg_types::{CallerId, IdentityError, IdentitySource, RegistryParams};
use devreg_verification::{DeviceRegistration, RegistrationError};

thread_local! {
    static CALLER: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Each thread votes under its own identity.
struct ThreadIdentity;

impl IdentitySource for ThreadIdentity {
    fn current_caller_id(&self) -> Result<CallerId, IdentityError> {
        CALLER
            .with(|c| c.borrow().clone())
            .map(CallerId::new)
            .ok_or_else(|| IdentityError("thread has no caller".into()))
    }
}

fn service(ledger: Arc<NullLedger>) -> Arc<DeviceRegistration> {
    Arc::new(DeviceRegistration::new(
        ledger,
        Arc::new(ThreadIdentity),
        &RegistryParams::default(),
    ))
}

#[test]
fn racing_submissions_of_one_hash_store_it_once() {
    let ledger = Arc::new(NullLedger::new());
    let registry = service(ledger.clone());
    // Build evidence up front so threads only race on the registry.
    let item = evidence("QmContested", device());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = registry.clone();
            let item = item.clone();
            thread::spawn(move || registry.start_vote(&[item], &device().public))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let ok = results.iter().filter(|r| r.is_ok()).count();
    let dup = results
        .iter()
        .filter(|r| matches!(r, Err(RegistrationError::DuplicateEvidence(_))))
        .count();
    assert_eq!(ok, 1);
    assert_eq!(dup, 7);
    assert_eq!(ledger.count(Namespace::Photo), 1);
    assert_eq!(ledger.count(Namespace::PhotoVote), 1);
}

#[test]
fn concurrent_voters_are_all_counted() {
    let ledger = Arc::new(NullLedger::new());
    let registry = service(ledger.clone());
    let vote = registry
        .start_vote(&[evidence("QmCrowd", device())], &device().public)
        .unwrap();

    let handles: Vec<_> = (0..6)
        .map(|i| {
            let registry = registry.clone();
            let vote_id = vote.vote_id.clone();
            thread::spawn(move || {
                CALLER.with(|c| *c.borrow_mut() = Some(format!("voter-{i}")));
                registry.cast_ballot(&vote_id, false)
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap().unwrap();
    }

    let stored = registry.get_vote(&vote.vote_id).unwrap();
    assert_eq!(stored.tally.vote_count, 6);
    assert_eq!(stored.tally.invalid_votes, 6);
    assert_eq!(stored.voters.len(), 6);
}
