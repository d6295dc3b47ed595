//! Shared fixtures for unit tests: RSA keys are slow to generate, so each is made once.

use std::sync::OnceLock;

use devreg_crypto::{generate_keypair, sign_evidence, DeviceKeyPair};

use crate::EvidenceRecord;

pub fn device() -> &'static DeviceKeyPair {
    static KEY: OnceLock<DeviceKeyPair> = OnceLock::new();
    KEY.get_or_init(|| generate_keypair(1024).unwrap())
}

pub fn other_device() -> &'static DeviceKeyPair {
    static KEY: OnceLock<DeviceKeyPair> = OnceLock::new();
    KEY.get_or_init(|| generate_keypair(1024).unwrap())
}

/// Evidence for `hash` signed by `signer`.
pub fn evidence(hash: &str, signer: &DeviceKeyPair) -> EvidenceRecord {
    let uploader = "device-owner";
    let timestamp = "1700000000";
    EvidenceRecord {
        content_hash: hash.into(),
        signature: sign_evidence(hash, uploader, timestamp, &signer.private).unwrap(),
        uploader: uploader.to_string(),
        timestamp: timestamp.to_string(),
        description: format!("photo {hash}"),
    }
}
