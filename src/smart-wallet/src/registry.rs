//! Static table of supported chains.

use std::{collections::BTreeMap, fs, path::Path};

use smart_wallet_types::ChainDescriptor;

use crate::errors::{ConfigError, WalletError};

/// Chains supported out of the box, with Alchemy endpoint templates.
const BUILTIN_CHAINS: &[(u64, &str, &str)] = &[
    (1, "Ethereum", "https://eth-mainnet.g.alchemy.com/v2/{api_key}"),
    (10, "Optimism", "https://opt-mainnet.g.alchemy.com/v2/{api_key}"),
    (100, "Gnosis", "https://gnosis-mainnet.g.alchemy.com/v2/{api_key}"),
    (137, "Polygon", "https://polygon-mainnet.g.alchemy.com/v2/{api_key}"),
    (8453, "Base", "https://base-mainnet.g.alchemy.com/v2/{api_key}"),
    (42161, "Arbitrum", "https://arb-mainnet.g.alchemy.com/v2/{api_key}"),
    (42220, "Celo", "https://celo-mainnet.g.alchemy.com/v2/{api_key}"),
];

/// Resolves a chain id to its descriptor. Built once at start-up and read-only afterwards.
#[derive(Clone, Debug)]
pub struct ChainRegistry {
    chains: BTreeMap<u64, ChainDescriptor>,
}

impl ChainRegistry {
    pub fn builtin() -> Self {
        let chains = BUILTIN_CHAINS
            .iter()
            .map(|(id, name, rpc)| (*id, ChainDescriptor::new(*id, *name, *rpc)))
            .collect();
        Self { chains }
    }

    /// Build from an explicit chain table. Duplicate ids are rejected rather than overwritten.
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = ChainDescriptor>,
    ) -> Result<Self, ConfigError> {
        let mut chains = BTreeMap::new();
        for descriptor in descriptors {
            let chain_id = descriptor.chain_id;
            if chains.insert(chain_id, descriptor).is_some() {
                return Err(ConfigError::DuplicateChain(chain_id));
            }
        }
        if chains.is_empty() {
            return Err(ConfigError::Empty);
        }
        Ok(Self { chains })
    }

    /// Parse a JSON array of [`ChainDescriptor`]s.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let descriptors: Vec<ChainDescriptor> = serde_json::from_str(json)?;
        Self::from_descriptors(descriptors)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn resolve(&self, chain_id: u64) -> Result<&ChainDescriptor, WalletError> {
        self.chains
            .get(&chain_id)
            .ok_or(WalletError::UnsupportedChain(chain_id))
    }

    pub fn get(&self, chain_id: u64) -> Option<&ChainDescriptor> {
        self.chains.get(&chain_id)
    }

    pub fn is_supported(&self, chain_id: u64) -> bool {
        self.chains.contains_key(&chain_id)
    }

    /// `(chain_id, name)` pairs in ascending chain id order.
    pub fn supported_chains(&self) -> Vec<(u64, &str)> {
        self.chains
            .values()
            .map(|chain| (chain.chain_id, chain.name.as_str()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChainDescriptor> {
        self.chains.values()
    }
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
