//! String-typed surface for collaborators.
//!
//! Addresses come in as hex strings (any case), amounts as decimal strings; results go out as
//! EIP-55 strings and decimal strings. The pool is injected, never global.

use std::sync::Arc;

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use smart_wallet_types::{Operation, PredictedWallet, WalletConfig, WalletInfo, WalletTransaction};

use crate::{
    errors::{ValidationError, WalletError},
    predictor::predict_address,
    provider::ProviderPool,
    reader::{TokenBalance, WalletReader},
    registry::ChainRegistry,
    signature::verify_signature,
    tx_hash::transaction_hash,
    utils::parse::{parse_address, parse_amount, parse_digest, parse_hex},
    validator::validate_config,
};

/// A proposed wallet transaction as received from a collaborator.
///
/// Gas fields and the refund sentinels are optional and default to zero / the zero address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionProposal {
    pub to: String,
    pub value: String,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub operation: u8,
    #[serde(default)]
    pub safe_tx_gas: Option<String>,
    #[serde(default)]
    pub base_gas: Option<String>,
    #[serde(default)]
    pub gas_price: Option<String>,
    #[serde(default)]
    pub gas_token: Option<String>,
    #[serde(default)]
    pub refund_receiver: Option<String>,
}

impl TransactionProposal {
    pub fn to_transaction(&self) -> Result<WalletTransaction, WalletError> {
        let amount = |value: &Option<String>| {
            value
                .as_deref()
                .map(parse_amount)
                .unwrap_or(Ok(U256::ZERO))
        };
        let address = |value: &Option<String>| {
            value
                .as_deref()
                .map(parse_address)
                .unwrap_or(Ok(Address::ZERO))
        };

        Ok(WalletTransaction {
            to: parse_address(&self.to)?,
            value: parse_amount(&self.value)?,
            data: parse_hex(&self.data)?,
            operation: Operation::try_from(self.operation).map_err(WalletError::InvalidOperation)?,
            safe_tx_gas: amount(&self.safe_tx_gas)?,
            base_gas: amount(&self.base_gas)?,
            gas_price: amount(&self.gas_price)?,
            gas_token: address(&self.gas_token)?,
            refund_receiver: address(&self.refund_receiver)?,
        })
    }
}

#[derive(Clone, Debug)]
pub struct SmartWalletService {
    registry: Arc<ChainRegistry>,
    reader: WalletReader,
}

impl SmartWalletService {
    pub fn new(pool: Arc<ProviderPool>) -> Self {
        Self {
            registry: pool.registry().clone(),
            reader: WalletReader::new(pool),
        }
    }

    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    pub fn reader(&self) -> &WalletReader {
        &self.reader
    }

    pub fn supported_chains(&self) -> Vec<(u64, &str)> {
        self.registry.supported_chains()
    }

    pub fn validate_config(
        &self,
        owners: &[String],
        threshold: u64,
        chain_id: u64,
    ) -> Result<WalletConfig, Vec<ValidationError>> {
        validate_config(&self.registry, owners, threshold, chain_id)
    }

    /// Validate, then predict. An unknown chain is reported as
    /// [`WalletError::UnsupportedChain`]; other problems as [`WalletError::InvalidConfig`].
    /// `salt` is a decimal string and defaults to zero.
    pub fn predict_address(
        &self,
        owners: &[String],
        threshold: u64,
        chain_id: u64,
        salt: Option<&str>,
    ) -> Result<PredictedWallet, WalletError> {
        let salt = salt.map(parse_amount).transpose()?.unwrap_or(U256::ZERO);
        let config = self
            .validate_config(owners, threshold, chain_id)
            .map_err(|errors| {
                if errors.contains(&ValidationError::UnsupportedChain(chain_id)) {
                    WalletError::UnsupportedChain(chain_id)
                } else {
                    WalletError::InvalidConfig(errors)
                }
            })?;
        predict_address(
            &self.registry,
            &config.owners,
            config.threshold,
            config.chain_id,
            salt,
        )
    }

    /// Digest owners sign. `nonce` is a decimal string.
    pub fn compute_transaction_hash(
        &self,
        wallet: &str,
        proposal: &TransactionProposal,
        nonce: &str,
        chain_id: u64,
    ) -> Result<B256, WalletError> {
        self.registry.resolve(chain_id)?;
        let wallet = parse_address(wallet)?;
        let tx = proposal.to_transaction()?;
        let nonce = parse_amount(nonce)?;
        Ok(transaction_hash(wallet, &tx, nonce, chain_id))
    }

    /// `false` for any malformed input as well as for a signature by someone else.
    pub fn verify_signature(&self, digest: &str, signature: &str, claimed_signer: &str) -> bool {
        let (Ok(digest), Ok(signature), Ok(signer)) = (
            parse_digest(digest),
            parse_hex(signature),
            parse_address(claimed_signer),
        ) else {
            return false;
        };
        verify_signature(&digest, &signature, &signer)
    }

    pub async fn read_owners(
        &self,
        wallet: &str,
        chain_id: u64,
    ) -> Result<Vec<String>, WalletError> {
        let owners = self.reader.owners_of(parse_address(wallet)?, chain_id).await?;
        Ok(owners.iter().map(|owner| owner.to_checksum(None)).collect())
    }

    pub async fn read_threshold(&self, wallet: &str, chain_id: u64) -> Result<u64, WalletError> {
        Ok(self.reader.threshold_of(parse_address(wallet)?, chain_id).await?)
    }

    /// Native balance in wei, as a decimal string.
    pub async fn read_balance(&self, wallet: &str, chain_id: u64) -> Result<String, WalletError> {
        let balance = self
            .reader
            .native_balance_of(parse_address(wallet)?, chain_id)
            .await?;
        Ok(balance.to_string())
    }

    pub async fn read_nonce(&self, wallet: &str, chain_id: u64) -> Result<String, WalletError> {
        let nonce = self.reader.nonce_of(parse_address(wallet)?, chain_id).await?;
        Ok(nonce.to_string())
    }

    pub async fn is_owner(
        &self,
        wallet: &str,
        candidate: &str,
        chain_id: u64,
    ) -> Result<bool, WalletError> {
        let wallet = parse_address(wallet)?;
        let candidate = parse_address(candidate)?;
        Ok(self.reader.is_owner(wallet, candidate, chain_id).await?)
    }

    pub async fn read_token_balance(
        &self,
        wallet: &str,
        token: &str,
        chain_id: u64,
    ) -> Result<TokenBalance, WalletError> {
        let wallet = parse_address(wallet)?;
        let token = parse_address(token)?;
        Ok(self.reader.token_balance_of(wallet, token, chain_id).await?)
    }

    pub async fn wallet_info(
        &self,
        wallet: &str,
        chain_id: u64,
    ) -> Result<WalletInfo, WalletError> {
        Ok(self.reader.wallet_info(parse_address(wallet)?, chain_id).await?)
    }
}
