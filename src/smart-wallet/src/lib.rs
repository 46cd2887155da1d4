//! Off-chain logic for multi-chain Safe smart wallets.
//!
//! - [`validator`]: owner/threshold/chain checks, run before anything is derived or stored.
//! - [`predictor`]: deterministic wallet address prediction.
//! - [`tx_hash`]: the canonical digest owners sign.
//! - [`signature`]: recovery-based signature checks and threshold counting.
//! - [`registry`] / [`provider`]: the chain table and one long-lived RPC handle per chain.
//! - [`reader`]: read-only queries against deployed wallets.
//! - [`service`]: the string-typed surface collaborators call.
//!
//! Everything except the provider-backed reads is pure and safe to call concurrently.

pub mod errors;
pub mod predictor;
pub mod provider;
pub mod reader;
pub mod registry;
pub mod service;
pub mod signature;
pub mod tx_hash;
pub mod utils;
pub mod validator;

#[cfg(test)]
mod mock;

pub use errors::{ConfigError, ConnectionError, Unavailable, ValidationError, WalletError};
pub use provider::{PoolSettings, ProviderPool, RpcTransport};
pub use reader::{TokenBalance, WalletReader};
pub use registry::ChainRegistry;
pub use service::{SmartWalletService, TransactionProposal};
pub use signature::{
    check_threshold, recover_signer, verify_signature, RejectReason, ThresholdCheck,
};
