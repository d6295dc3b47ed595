//! Abstract ledger interface for DEVREG.
//!
//! Every storage backend (LMDB, in-memory for testing) implements [`Ledger`].
//! Records of different kinds share one key space, partitioned by
//! [`Namespace`] through composite [`StateKey`]s. Operations stage their writes
//! in a [`LedgerTxn`] and hand them to the backend in one atomic commit, which
//! is refused if anything the transaction read has changed in the meantime.

pub mod error;
pub mod key;
pub mod ledger;
pub mod transaction;

pub use error::StoreError;
pub use key::{Namespace, StateKey};
pub use ledger::{ensure_unchanged, Ledger, ObservedRead};
pub use transaction::LedgerTxn;
