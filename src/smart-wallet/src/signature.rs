//! Owner signature verification.
//!
//! Verification failure is an ordinary outcome and is reported as `false`, never as an error.
//! Addresses are compared as bytes, so the caller's spelling (checksum, case) is irrelevant.

use std::collections::HashSet;

use alloy_primitives::{Address, Bytes, B256};
use smart_wallet_types::SignatureRecord;

use crate::utils::crypto::{ecrecover_address, SIGNATURE_LEN};

/// Address that produced `signature` over exactly `digest`, if any.
pub fn recover_signer(digest: &B256, signature: &[u8]) -> Option<Address> {
    ecrecover_address(digest, signature)
}

pub fn verify_signature(digest: &B256, signature: &[u8], claimed_signer: &Address) -> bool {
    recover_signer(digest, signature).is_some_and(|recovered| recovered == *claimed_signer)
}

/// Why a signature did not count towards the threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// Produced over some other digest.
    DigestMismatch,
    /// Does not recover to the claimed signer.
    InvalidSignature,
    /// The signer is not an owner of the wallet.
    NotAnOwner,
    /// The owner already has an accepted signature.
    DuplicateSigner,
}

/// Outcome of checking a set of signatures against a wallet's owners and threshold.
///
/// Only [`check_threshold`] builds one, so every accepted record has been verified.
#[derive(Clone, Debug)]
pub struct ThresholdCheck {
    threshold: u64,
    accepted: Vec<SignatureRecord>,
    rejected: Vec<(Address, RejectReason)>,
}

impl ThresholdCheck {
    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Counted signatures, one per owner, in input order.
    pub fn accepted(&self) -> &[SignatureRecord] {
        &self.accepted
    }

    pub fn rejected(&self) -> &[(Address, RejectReason)] {
        &self.rejected
    }

    /// Enough distinct owners signed the digest.
    pub fn is_met(&self) -> bool {
        self.threshold >= 1 && self.accepted.len() as u64 >= self.threshold
    }

    /// Accepted signatures ordered by ascending signer, concatenated as the wallet's
    /// `execTransaction` expects. `v` is normalised to 27/28: the wallet reads 0 and 1 as
    /// contract and pre-approved signatures.
    pub fn packed_signatures(&self) -> Bytes {
        let mut sorted: Vec<&SignatureRecord> = self
            .accepted
            .iter()
            .filter(|record| record.signature.len() == SIGNATURE_LEN)
            .collect();
        sorted.sort_by_key(|record| record.signer);

        let mut packed = Vec::with_capacity(sorted.len() * SIGNATURE_LEN);
        for record in sorted {
            let mut sig = record.signature.to_vec();
            if sig[SIGNATURE_LEN - 1] < 27 {
                sig[SIGNATURE_LEN - 1] += 27;
            }
            packed.extend_from_slice(&sig);
        }
        Bytes::from(packed)
    }
}

/// Count the distinct owners whose signature verifies over `digest`.
pub fn check_threshold(
    digest: &B256,
    records: &[SignatureRecord],
    owners: &[Address],
    threshold: u64,
) -> ThresholdCheck {
    let owners: HashSet<&Address> = owners.iter().collect();
    let mut signed: HashSet<Address> = HashSet::new();
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();

    for record in records {
        let reason = if record.digest != *digest {
            Some(RejectReason::DigestMismatch)
        } else if !verify_signature(digest, &record.signature, &record.signer) {
            Some(RejectReason::InvalidSignature)
        } else if !owners.contains(&record.signer) {
            Some(RejectReason::NotAnOwner)
        } else if !signed.insert(record.signer) {
            Some(RejectReason::DuplicateSigner)
        } else {
            None
        };

        match reason {
            Some(reason) => rejected.push((record.signer, reason)),
            None => accepted.push(record.clone()),
        }
    }

    ThresholdCheck {
        threshold,
        accepted,
        rejected,
    }
}
