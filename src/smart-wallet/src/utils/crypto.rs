//! Cryptographic helpers.
//!
//! Purpose: one keccak implementation for every digest the library produces, and secp256k1
//! public key recovery for checking owner signatures off-chain.

use alloy_primitives::{Address, Bytes, B256};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use sha3::{Digest, Keccak256};

/// Length of an `r || s || v` signature.
pub const SIGNATURE_LEN: usize = 65;

pub fn keccak256(bytes: &[u8]) -> B256 {
    let mut h = Keccak256::new();
    h.update(bytes);
    B256::from_slice(h.finalize().as_slice())
}

/// Address controlled by `key`: the low 20 bytes of keccak256 of the uncompressed point.
pub fn public_key_address(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

/// Recover the address that signed `digest`.
///
/// Notes:
/// - `signature` must be exactly 65 bytes, `r || s || v`.
/// - We accept v in {0,1,27,28}. Any other v is rejected rather than guessed.
/// - High-s signatures are rejected by k256, matching the malleability rule wallets enforce.
pub fn ecrecover_address(digest: &B256, signature: &[u8]) -> Option<Address> {
    if signature.len() != SIGNATURE_LEN {
        return None;
    }
    let v = match signature[64] {
        v @ (0 | 1) => v,
        v @ (27 | 28) => v - 27,
        _ => return None,
    };

    let sig = Signature::from_slice(&signature[..64]).ok()?;
    let recovery_id = RecoveryId::from_byte(v)?;
    let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &sig, recovery_id).ok()?;
    Some(public_key_address(&key))
}

/// Sign `digest` and return the 65-byte `r || s || v` signature with v in {27,28}.
///
/// Only tests and developer tooling sign; the library itself never holds owner keys.
pub fn sign_digest(signing_key: &SigningKey, digest: &B256) -> Result<Bytes, k256::ecdsa::Error> {
    let (signature, recovery_id) = signing_key.sign_prehash_recoverable(digest.as_slice())?;

    let mut sig_bytes = Vec::with_capacity(SIGNATURE_LEN);
    sig_bytes.extend_from_slice(&signature.to_bytes());
    sig_bytes.push(27 + recovery_id.to_byte());
    Ok(Bytes::from(sig_bytes))
}
