//! LMDB ledger integrity checks.
//!
//! Run on startup to detect corruption early: every stored key must be a
//! well-formed composite key in a known namespace.

use std::collections::BTreeMap;

use devreg_store::{Namespace, StateKey};

use crate::{LmdbError, LmdbLedger};

/// Summary of an integrity check run.
#[derive(Debug, Default)]
pub struct IntegrityReport {
    pub total_entries: u64,
    pub entries_by_namespace: BTreeMap<&'static str, u64>,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Scan every record of the ledger.
///
/// Malformed keys are recorded in the report rather than causing a hard error.
pub fn check_integrity(ledger: &LmdbLedger) -> Result<IntegrityReport, LmdbError> {
    let mut report = IntegrityReport::default();
    let env = ledger.environment();
    let rtxn = env.env().read_txn()?;

    for entry in env.state_db().iter(&rtxn)? {
        let (raw_key, _value) = entry?;
        report.total_entries += 1;
        match StateKey::from_bytes(raw_key) {
            Ok(key) => {
                let ns = key.namespace_str();
                match Namespace::ALL.iter().find(|n| n.as_str() == ns) {
                    Some(n) => *report.entries_by_namespace.entry(n.as_str()).or_default() += 1,
                    None => report.errors.push(format!("unknown namespace in key {key}")),
                }
            }
            Err(e) => report.errors.push(e.to_string()),
        }
    }

    Ok(report)
}
