//! EMSA-PSS verification that recovers the salt length from the signature.
//!
//! Signers disagree on salt length: some use the digest length, others the
//! maximum the modulus allows. The padding string in the decoded data block
//! says which, so the check reads the salt length from there
//! (RFC 8017 §9.1.2 with `sLen` taken from the position of the `0x01` octet).

use rsa::hazmat::rsa_encrypt;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPublicKey};
use sha2::{Digest, Sha256};

const H_LEN: usize = 32;

/// Whether `sig` is a PSS signature over `m_hash` with any salt length.
pub(crate) fn verify_any_salt(key: &RsaPublicKey, m_hash: &[u8; H_LEN], sig: &[u8]) -> bool {
    let k = key.size();
    if sig.len() != k {
        return false;
    }
    let s = BigUint::from_bytes_be(sig);
    if &s >= key.n() {
        return false;
    }
    let Ok(m) = rsa_encrypt(key, &s) else {
        return false;
    };
    let raw = m.to_bytes_be();
    if raw.len() > k {
        return false;
    }
    let mut padded = vec![0u8; k];
    padded[k - raw.len()..].copy_from_slice(&raw);

    let em_bits = key.n().bits() - 1;
    let em_len = (em_bits + 7) / 8;
    // A modulus of 8n+1 bits leaves one leading zero octet outside EM.
    let em = if em_len < k {
        if padded[0] != 0 {
            return false;
        }
        &mut padded[1..]
    } else {
        &mut padded[..]
    };
    verify_encoded(m_hash, em, em_bits)
}

fn verify_encoded(m_hash: &[u8], em: &mut [u8], em_bits: usize) -> bool {
    let em_len = em.len();
    if em_len < H_LEN + 2 || em[em_len - 1] != 0xbc {
        return false;
    }
    let (db, rest) = em.split_at_mut(em_len - H_LEN - 1);
    let h = &rest[..H_LEN];

    let bit_mask = 0xffu8 >> (8 * em_len - em_bits);
    if db[0] & !bit_mask != 0 {
        return false;
    }
    mgf1_xor(db, h);
    db[0] &= bit_mask;

    // DB = PS (zeros) || 0x01 || salt
    let Some(ps_len) = db.iter().position(|&b| b != 0) else {
        return false;
    };
    if db[ps_len] != 0x01 {
        return false;
    }
    let salt = &db[ps_len + 1..];

    let expected = Sha256::new()
        .chain_update([0u8; 8])
        .chain_update(m_hash)
        .chain_update(salt)
        .finalize();
    expected.as_slice() == h
}

fn mgf1_xor(out: &mut [u8], seed: &[u8]) {
    for (counter, chunk) in out.chunks_mut(H_LEN).enumerate() {
        let mask = Sha256::new()
            .chain_update(seed)
            .chain_update((counter as u32).to_be_bytes())
            .finalize();
        for (o, m) in chunk.iter_mut().zip(mask.iter()) {
            *o ^= m;
        }
    }
}
