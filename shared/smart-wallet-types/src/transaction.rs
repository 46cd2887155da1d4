use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// How the wallet executes a transaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Operation {
    #[default]
    Call = 0,
    DelegateCall = 1,
}

impl Operation {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Operation {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Operation::Call),
            1 => Ok(Operation::DelegateCall),
            other => Err(other),
        }
    }
}

/// A transaction proposed to a smart wallet.
///
/// Gas accounting fields default to zero and `gas_token` / `refund_receiver` default to the
/// zero address ("no gas token", "no refund receiver"). The replay nonce is supplied separately
/// when hashing because it belongs to the wallet, not to the proposal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletTransaction {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub operation: Operation,
    #[serde(default)]
    pub safe_tx_gas: U256,
    #[serde(default)]
    pub base_gas: U256,
    #[serde(default)]
    pub gas_price: U256,
    #[serde(default)]
    pub gas_token: Address,
    #[serde(default)]
    pub refund_receiver: Address,
}

impl WalletTransaction {
    /// Plain `Call` with zeroed gas accounting.
    pub fn call(to: Address, value: U256, data: Bytes) -> Self {
        Self {
            to,
            value,
            data,
            ..Default::default()
        }
    }

    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operation = operation;
        self
    }

    pub fn with_gas(mut self, safe_tx_gas: U256, base_gas: U256, gas_price: U256) -> Self {
        self.safe_tx_gas = safe_tx_gas;
        self.base_gas = base_gas;
        self.gas_price = gas_price;
        self
    }

    pub fn with_refund(mut self, gas_token: Address, refund_receiver: Address) -> Self {
        self.gas_token = gas_token;
        self.refund_receiver = refund_receiver;
        self
    }
}
