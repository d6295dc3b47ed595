//! LMDB ledger backend for DEVREG.
//!
//! Implements the [`devreg_store::Ledger`] trait using the `heed` LMDB bindings.
//! All namespaces share a single `state` database; composite keys keep them apart.

pub mod environment;
pub mod error;
pub mod integrity;
pub mod ledger;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use integrity::{check_integrity, IntegrityReport};
pub use ledger::LmdbLedger;
