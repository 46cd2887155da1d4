use std::{path::PathBuf, time::Duration};

use alloy_primitives::Address;
use ethers::providers::ProviderError;
use thiserror::Error;

/// A problem with a proposed owner/threshold/chain configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("at least one owner is required")]
    EmptyOwners,
    #[error("threshold {threshold} must be between 1 and the number of owners ({owners})")]
    ThresholdOutOfRange { threshold: u64, owners: usize },
    #[error("invalid owner address at index {index}: {value:?}")]
    InvalidOwnerAddress { index: usize, value: String },
    #[error("owner at index {index} duplicates owner at index {first}")]
    DuplicateOwner { index: usize, first: usize },
    #[error("chain {0} is not supported")]
    UnsupportedChain(u64),
}

/// Errors from the pure operations (validation, prediction, hashing) and input parsing.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("invalid wallet configuration: {}", join_errors(.0))]
    InvalidConfig(Vec<ValidationError>),
    #[error("chain {0} is not supported")]
    UnsupportedChain(u64),
    #[error("invalid address: {0:?}")]
    InvalidAddress(String),
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),
    #[error("invalid hex data: {0:?}")]
    InvalidHex(String),
    #[error("unknown operation {0}")]
    InvalidOperation(u8),
    #[error(transparent)]
    Unavailable(#[from] Unavailable),
}

/// The provider could not be reached in time or answered with a transport-level failure.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("request to chain {chain_id} timed out after {after:?}")]
    Timeout { chain_id: u64, after: Duration },
    #[error("rpc request to chain {chain_id} failed")]
    Transport {
        chain_id: u64,
        #[source]
        source: ProviderError,
    },
    #[error("no provider registered for chain {0}")]
    NoProvider(u64),
}

/// A read against a deployed wallet could not currently be answered.
///
/// This never means "the wallet has no owners": callers decide whether to retry.
#[derive(Debug, Error)]
pub enum Unavailable {
    #[error("chain {0} is not supported")]
    UnsupportedChain(u64),
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    /// The node answered, but the call reverted.
    #[error("call to {address} on chain {chain_id} reverted: {reason}")]
    Reverted {
        address: Address,
        chain_id: u64,
        reason: String,
    },
    #[error("{address} on chain {chain_id} returned no decodable data for `{call}`")]
    NotAWallet {
        address: Address,
        chain_id: u64,
        call: &'static str,
    },
}

impl Unavailable {
    /// Transport failures and timeouts may succeed on retry; reverts and the rest will not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Unavailable::Connection(_))
    }
}

/// Chain configuration could not be loaded or a provider could not be built from it.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed reading chain table {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed parsing chain table")]
    Parse(#[from] serde_json::Error),
    #[error("chain {0} is listed more than once")]
    DuplicateChain(u64),
    #[error("chain table is empty")]
    Empty,
    #[error("invalid rpc endpoint for chain {chain_id}: {reason}")]
    InvalidEndpoint { chain_id: u64, reason: String },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
