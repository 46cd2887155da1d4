//! Read-only queries against deployed wallets, layered on the provider pool.
//!
//! Every call is independent: dropping one pending read does not affect any other.

use std::sync::Arc;

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use serde::{Deserialize, Serialize};
use smart_wallet_types::{
    interfaces::{ISafe, ISafeProxyFactory, IERC20},
    WalletInfo,
};
use tracing::debug;

use crate::{errors::Unavailable, provider::ProviderPool};

/// ERC-20 holding of a wallet. `balance` is a decimal string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBalance {
    pub token: Address,
    pub symbol: String,
    pub decimals: u8,
    pub balance: String,
}

#[derive(Clone, Debug)]
pub struct WalletReader {
    pool: Arc<ProviderPool>,
}

impl WalletReader {
    pub fn new(pool: Arc<ProviderPool>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Arc<ProviderPool> {
        &self.pool
    }

    /// Call a view function and decode its return data.
    ///
    /// A revert and undecodable return data both mean `target` does not implement `C`.
    async fn view<C: SolCall>(
        &self,
        chain_id: u64,
        target: Address,
        call: C,
    ) -> Result<C::Return, Unavailable> {
        let not_implemented = || Unavailable::NotAWallet {
            address: target,
            chain_id,
            call: C::SIGNATURE,
        };

        let output = match self
            .pool
            .eth_call(chain_id, target, Bytes::from(call.abi_encode()))
            .await
        {
            Err(Unavailable::Reverted { reason, .. }) => {
                debug!(chain_id, %target, call = C::SIGNATURE, %reason, "view call reverted");
                return Err(not_implemented());
            }
            result => result?,
        };
        C::abi_decode_returns(&output, true).map_err(|_| {
            debug!(
                chain_id,
                %target,
                call = C::SIGNATURE,
                len = output.len(),
                "undecodable return data"
            );
            not_implemented()
        })
    }

    pub async fn owners_of(
        &self,
        wallet: Address,
        chain_id: u64,
    ) -> Result<Vec<Address>, Unavailable> {
        Ok(self.view(chain_id, wallet, ISafe::getOwnersCall {}).await?._0)
    }

    pub async fn threshold_of(&self, wallet: Address, chain_id: u64) -> Result<u64, Unavailable> {
        let threshold = self.view(chain_id, wallet, ISafe::getThresholdCall {}).await?._0;
        u64::try_from(threshold).map_err(|_| Unavailable::NotAWallet {
            address: wallet,
            chain_id,
            call: ISafe::getThresholdCall::SIGNATURE,
        })
    }

    /// Next transaction nonce of the wallet.
    pub async fn nonce_of(&self, wallet: Address, chain_id: u64) -> Result<U256, Unavailable> {
        Ok(self.view(chain_id, wallet, ISafe::nonceCall {}).await?._0)
    }

    pub async fn is_owner(
        &self,
        wallet: Address,
        candidate: Address,
        chain_id: u64,
    ) -> Result<bool, Unavailable> {
        Ok(self
            .view(chain_id, wallet, ISafe::isOwnerCall { owner: candidate })
            .await?
            ._0)
    }

    pub async fn native_balance_of(
        &self,
        wallet: Address,
        chain_id: u64,
    ) -> Result<U256, Unavailable> {
        self.pool.native_balance(chain_id, wallet).await
    }

    pub async fn token_balance_of(
        &self,
        wallet: Address,
        token: Address,
        chain_id: u64,
    ) -> Result<TokenBalance, Unavailable> {
        let (balance, decimals, symbol) = tokio::try_join!(
            self.view(chain_id, token, IERC20::balanceOfCall { account: wallet }),
            self.view(chain_id, token, IERC20::decimalsCall {}),
            self.view(chain_id, token, IERC20::symbolCall {}),
        )?;
        Ok(TokenBalance {
            token,
            symbol: symbol._0,
            decimals: decimals._0,
            balance: balance._0.to_string(),
        })
    }

    /// Owners, threshold, nonce and native balance in one snapshot.
    pub async fn wallet_info(
        &self,
        wallet: Address,
        chain_id: u64,
    ) -> Result<WalletInfo, Unavailable> {
        let (owners, threshold, nonce, balance) = tokio::try_join!(
            self.owners_of(wallet, chain_id),
            self.threshold_of(wallet, chain_id),
            self.nonce_of(wallet, chain_id),
            self.native_balance_of(wallet, chain_id),
        )?;
        Ok(WalletInfo {
            address: wallet,
            chain_id,
            owners,
            threshold,
            nonce: nonce.to_string(),
            balance: balance.to_string(),
        })
    }

    /// `proxyCreationCode()` of a proxy factory, for configuring CREATE2 prediction.
    pub async fn proxy_creation_code(
        &self,
        factory: Address,
        chain_id: u64,
    ) -> Result<Bytes, Unavailable> {
        Ok(self
            .view(chain_id, factory, ISafeProxyFactory::proxyCreationCodeCall {})
            .await?
            ._0)
    }
}
