#![allow(dead_code)]

use std::sync::{Arc, OnceLock};

use devreg_crypto::{generate_keypair, sign_evidence, DeviceKeyPair};
use devreg_nullables::{NullIdentity, NullLedger};
use devreg_types::RegistryParams;
use devreg_verification::{DeviceRegistration, EvidenceRecord};

pub fn device() -> &'static DeviceKeyPair {
    static KEY: OnceLock<DeviceKeyPair> = OnceLock::new();
    KEY.get_or_init(|| generate_keypair(1024).unwrap())
}

pub fn intruder() -> &'static DeviceKeyPair {
    static KEY: OnceLock<DeviceKeyPair> = OnceLock::new();
    KEY.get_or_init(|| generate_keypair(1024).unwrap())
}

pub fn evidence(hash: &str, signer: &DeviceKeyPair) -> EvidenceRecord {
    let uploader = "x509::CN=device-owner";
    let timestamp = "1718000000";
    EvidenceRecord {
        content_hash: hash.into(),
        signature: sign_evidence(hash, uploader, timestamp, &signer.private).unwrap(),
        uploader: uploader.to_string(),
        timestamp: timestamp.to_string(),
        description: String::new(),
    }
}

pub struct Harness {
    pub ledger: Arc<NullLedger>,
    pub identity: Arc<NullIdentity>,
    pub registry: DeviceRegistration,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_params(RegistryParams::default())
    }

    pub fn with_params(params: RegistryParams) -> Self {
        let ledger = Arc::new(NullLedger::new());
        let identity = Arc::new(NullIdentity::new());
        let registry = DeviceRegistration::new(ledger.clone(), identity.clone(), &params);
        Self {
            ledger,
            identity,
            registry,
        }
    }

    pub fn as_voter(&self, voter: &str) -> &DeviceRegistration {
        self.identity.set_caller(voter);
        &self.registry
    }
}
