//! One long-lived RPC handle per supported chain.
//!
//! The pool is populated once, eagerly, from the chain registry and is read-only afterwards,
//! so lookups need no locking. Handles are not pre-flighted: an unreachable endpoint only
//! surfaces as a [`ConnectionError`] when a call is made against it.

use std::{collections::HashMap, fmt::Debug, future::Future, sync::Arc, time::Duration};

use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use ethers::{
    providers::{Http, JsonRpcClient, Middleware, Provider, ProviderError, RpcError},
    types::{transaction::eip2718::TypedTransaction, TransactionRequest, H160},
};
use tracing::{debug, info, warn};

use crate::{
    errors::{ConfigError, ConnectionError, Unavailable},
    registry::ChainRegistry,
};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Remote calls the library needs from a chain. Implemented by ethers providers and by
/// in-memory fakes in tests.
#[async_trait]
pub trait RpcTransport: Debug + Send + Sync {
    /// `eth_call` against `to` at the latest block.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ProviderError>;

    /// `eth_getBalance` at the latest block.
    async fn balance(&self, address: Address) -> Result<U256, ProviderError>;
}

#[async_trait]
impl<P: JsonRpcClient + 'static> RpcTransport for Provider<P> {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ProviderError> {
        let tx: TypedTransaction = TransactionRequest::new()
            .to(H160::from_slice(to.as_slice()))
            .data(data.to_vec())
            .into();
        let out = Middleware::call(self, &tx, None).await?;
        Ok(Bytes::from(out.to_vec()))
    }

    async fn balance(&self, address: Address) -> Result<U256, ProviderError> {
        let balance = self
            .get_balance(H160::from_slice(address.as_slice()), None)
            .await?;
        // both sides store little-endian u64 limbs
        Ok(U256::from_limbs(balance.0))
    }
}

/// Settings used to build the pool.
#[derive(Clone, Debug)]
pub struct PoolSettings {
    /// Substituted into each chain's endpoint template.
    pub api_key: String,
    /// Applied to every remote call; elapsed calls fail with [`ConnectionError::Timeout`].
    pub request_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Chain id -> RPC handle.
#[derive(Debug)]
pub struct ProviderPool {
    registry: Arc<ChainRegistry>,
    transports: HashMap<u64, Arc<dyn RpcTransport>>,
    request_timeout: Duration,
}

impl ProviderPool {
    /// Create an HTTP provider for every chain in `registry`.
    pub fn connect(
        registry: Arc<ChainRegistry>,
        settings: &PoolSettings,
    ) -> Result<Self, ConfigError> {
        let mut transports: HashMap<u64, Arc<dyn RpcTransport>> = HashMap::new();
        for chain in registry.iter() {
            let url = chain.rpc_url(&settings.api_key);
            let provider = Provider::<Http>::try_from(url.as_str()).map_err(|e| {
                ConfigError::InvalidEndpoint {
                    chain_id: chain.chain_id,
                    reason: e.to_string(),
                }
            })?;
            // The URL carries the API key; only log the chain.
            info!(chain_id = chain.chain_id, name = %chain.name, "provider created");
            transports.insert(chain.chain_id, Arc::new(provider));
        }

        Ok(Self {
            registry,
            transports,
            request_timeout: settings.request_timeout,
        })
    }

    /// Build a pool from caller-supplied transports. Chains in `registry` without a transport
    /// fail lookups with [`ConnectionError::NoProvider`].
    pub fn with_transports(
        registry: Arc<ChainRegistry>,
        transports: impl IntoIterator<Item = (u64, Arc<dyn RpcTransport>)>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            transports: transports.into_iter().collect(),
            request_timeout,
        }
    }

    pub fn registry(&self) -> &Arc<ChainRegistry> {
        &self.registry
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Handle for `chain_id`.
    pub fn connection(&self, chain_id: u64) -> Result<&dyn RpcTransport, Unavailable> {
        if !self.registry.is_supported(chain_id) {
            return Err(Unavailable::UnsupportedChain(chain_id));
        }
        self.transports
            .get(&chain_id)
            .map(|transport| transport.as_ref())
            .ok_or(Unavailable::Connection(ConnectionError::NoProvider(chain_id)))
    }

    /// `eth_call` against `to`. A revert is reported as [`Unavailable::Reverted`], never as a
    /// connection failure.
    pub async fn eth_call(
        &self,
        chain_id: u64,
        to: Address,
        data: Bytes,
    ) -> Result<Bytes, Unavailable> {
        let transport = self.connection(chain_id)?;
        debug!(chain_id, %to, len = data.len(), "eth_call");
        match self.timed(chain_id, transport.call(to, data)).await {
            Err(ConnectionError::Transport { source, .. }) if is_revert(&source) => {
                Err(Unavailable::Reverted {
                    address: to,
                    chain_id,
                    reason: source.to_string(),
                })
            }
            result => Ok(result?),
        }
    }

    pub async fn native_balance(
        &self,
        chain_id: u64,
        address: Address,
    ) -> Result<U256, Unavailable> {
        let transport = self.connection(chain_id)?;
        debug!(chain_id, %address, "eth_getBalance");
        Ok(self.timed(chain_id, transport.balance(address)).await?)
    }

    async fn timed<T, F>(&self, chain_id: u64, request: F) -> Result<T, ConnectionError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        match tokio::time::timeout(self.request_timeout, request).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(source)) => {
                if is_revert(&source) {
                    debug!(chain_id, error = %source, "rpc call reverted");
                } else {
                    warn!(chain_id, error = %source, "rpc request failed");
                }
                Err(ConnectionError::Transport { chain_id, source })
            }
            Err(_) => {
                warn!(chain_id, timeout = ?self.request_timeout, "rpc request timed out");
                Err(ConnectionError::Timeout {
                    chain_id,
                    after: self.request_timeout,
                })
            }
        }
    }
}

/// Node-side `execution reverted` answer (EIP-1474 code 3, or a revert message under another
/// code). Rate limits and other error responses stay connection failures.
fn is_revert(error: &ProviderError) -> bool {
    error.as_error_response().is_some_and(|response| {
        response.code == 3 || response.message.to_ascii_lowercase().contains("revert")
    })
}
