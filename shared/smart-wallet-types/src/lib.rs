//! Shared types for multi-chain Safe smart wallets.
//!
//! These types are plain data: the library validates and derives them, the tooling prints them.

pub mod chain;
pub mod interfaces;
pub mod transaction;
pub mod wallet;

pub use chain::{ChainDescriptor, FactoryDeployment, API_KEY_PLACEHOLDER};
pub use transaction::{Operation, WalletTransaction};
pub use wallet::{DerivationScheme, PredictedWallet, SignatureRecord, WalletConfig, WalletInfo};
