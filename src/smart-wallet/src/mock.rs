//! In-memory transport for tests.
//!
//! Answers `eth_call` by `(target, selector)` and `eth_getBalance` by address, so tests can
//! exercise the readers without any network.

use std::{collections::HashMap, time::Duration};

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use ethers::providers::ProviderError;

use crate::provider::RpcTransport;

#[derive(Debug, Default)]
pub struct MockTransport {
    calls: HashMap<(Address, [u8; 4]), Bytes>,
    balances: HashMap<Address, U256>,
    delay: Option<Duration>,
    failing: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request fails at the transport level.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Answer calls of `C` against `target` with the raw `output`.
    pub fn with_raw<C: SolCall>(mut self, target: Address, output: Vec<u8>) -> Self {
        self.calls.insert((target, C::SELECTOR), Bytes::from(output));
        self
    }

    pub fn with_balance(mut self, address: Address, balance: U256) -> Self {
        self.balances.insert(address, balance);
        self
    }

    async fn pause(&self) -> Result<(), ProviderError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing {
            return Err(ProviderError::CustomError("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RpcTransport for MockTransport {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ProviderError> {
        self.pause().await?;
        let Some(selector) = data.get(..4) else {
            return Ok(Bytes::new());
        };
        let mut key = [0u8; 4];
        key.copy_from_slice(selector);
        // Accounts without code answer every call with empty data.
        Ok(self.calls.get(&(to, key)).cloned().unwrap_or_default())
    }

    async fn balance(&self, address: Address) -> Result<U256, ProviderError> {
        self.pause().await?;
        Ok(self.balances.get(&address).copied().unwrap_or_default())
    }
}
