use alloy_primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};

/// Placeholder substituted with the provider API key when rendering an RPC endpoint.
pub const API_KEY_PLACEHOLDER: &str = "{api_key}";

/// Proxy factory deployment used for CREATE2 address derivation on a chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryDeployment {
    /// Safe proxy factory (the CREATE2 deployer).
    pub factory: Address,
    /// Safe singleton the proxy delegates to.
    pub singleton: Address,
    /// Fallback handler passed to `setup`.
    #[serde(default)]
    pub fallback_handler: Address,
    /// `proxyCreationCode()` of the factory.
    pub proxy_creation_code: Bytes,
}

/// One supported chain. Created from the chain table at start-up, never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainDescriptor {
    pub chain_id: u64,
    pub name: String,
    /// RPC endpoint, optionally containing [`API_KEY_PLACEHOLDER`].
    pub rpc_template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factory: Option<FactoryDeployment>,
}

impl ChainDescriptor {
    pub fn new(chain_id: u64, name: impl Into<String>, rpc_template: impl Into<String>) -> Self {
        Self {
            chain_id,
            name: name.into(),
            rpc_template: rpc_template.into(),
            factory: None,
        }
    }

    pub fn with_factory(mut self, factory: FactoryDeployment) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Render the endpoint for `api_key`. Templates without a placeholder are used verbatim.
    pub fn rpc_url(&self, api_key: &str) -> String {
        self.rpc_template.replace(API_KEY_PLACEHOLDER, api_key)
    }
}
