use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

/// Owner set, threshold and chain of a wallet, as accepted by the validator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Ordered; order is part of address derivation.
    pub owners: Vec<Address>,
    pub threshold: u64,
    pub chain_id: u64,
}

/// How a predicted address was derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivationScheme {
    /// `keccak256(abi.encode(owners, threshold, salt))[..20]`.
    Legacy,
    /// Proxy factory CREATE2 derivation.
    Create2,
}

/// A wallet address derived off-chain together with the inputs that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictedWallet {
    pub address: Address,
    pub owners: Vec<Address>,
    pub threshold: u64,
    pub chain_id: u64,
    pub salt: U256,
    pub scheme: DerivationScheme,
}

/// A signature some owner claims to have produced over `digest`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRecord {
    pub signer: Address,
    /// `r || s || v`.
    pub signature: Bytes,
    pub digest: B256,
}

/// Snapshot of a deployed wallet. Amounts are decimal strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletInfo {
    pub address: Address,
    pub chain_id: u64,
    pub owners: Vec<Address>,
    pub threshold: u64,
    pub nonce: String,
    pub balance: String,
}
