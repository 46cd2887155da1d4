//! Deterministic wallet address prediction.
//!
//! The address is a pure function of `(owners, threshold, chain, salt)`; nothing here touches
//! the network or the clock. Owner order is part of the input: permuting owners yields a
//! different address.
//!
//! Two schemes are supported, chosen per chain:
//! - `Legacy` (no factory configured): `keccak256(abi.encode(address[] owners, uint256 threshold,
//!   bytes salt))[..20]`, where `salt` is the 32-byte big-endian salt nonce.
//! - `Create2` (chain carries a [`FactoryDeployment`]): the address the Safe proxy factory's
//!   `createProxyWithNonce` would deploy to.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{SolCall, SolValue};
use smart_wallet_types::{
    interfaces::{ISafe, ISafeProxyFactory},
    DerivationScheme, FactoryDeployment, PredictedWallet,
};
use tracing::debug;

use crate::{errors::WalletError, registry::ChainRegistry, utils::crypto::keccak256};

/// Predict the wallet address for `owners`/`threshold` on `chain_id`.
///
/// Fails only with [`WalletError::UnsupportedChain`]; never with a network error.
pub fn predict_address(
    registry: &ChainRegistry,
    owners: &[Address],
    threshold: u64,
    chain_id: u64,
    salt: U256,
) -> Result<PredictedWallet, WalletError> {
    let chain = registry.resolve(chain_id)?;

    let (address, scheme) = match &chain.factory {
        Some(deployment) => (
            create2_address(deployment, owners, threshold, salt),
            DerivationScheme::Create2,
        ),
        None => (legacy_address(owners, threshold, salt), DerivationScheme::Legacy),
    };
    debug!(chain_id, %address, ?scheme, owners = owners.len(), "predicted wallet address");

    Ok(PredictedWallet {
        address,
        owners: owners.to_vec(),
        threshold,
        chain_id,
        salt,
        scheme,
    })
}

/// `abi.encode(address[] owners, uint256 threshold, bytes salt)`.
pub fn legacy_preimage(owners: &[Address], threshold: u64, salt: U256) -> Vec<u8> {
    let salt_bytes = Bytes::from(salt.to_be_bytes::<32>().to_vec());
    (owners.to_vec(), U256::from(threshold), salt_bytes).abi_encode_params()
}

pub fn legacy_address(owners: &[Address], threshold: u64, salt: U256) -> Address {
    let digest = keccak256(&legacy_preimage(owners, threshold, salt));
    Address::from_slice(&digest[..20])
}

/// Calldata of the `setup` call the proxy is initialised with.
pub fn setup_calldata(owners: &[Address], threshold: u64, fallback_handler: Address) -> Vec<u8> {
    ISafe::setupCall {
        _owners: owners.to_vec(),
        _threshold: U256::from(threshold),
        to: Address::ZERO,
        data: Bytes::new(),
        fallbackHandler: fallback_handler,
        paymentToken: Address::ZERO,
        payment: U256::ZERO,
        paymentReceiver: Address::ZERO,
    }
    .abi_encode()
}

/// CREATE2 address of `createProxyWithNonce(singleton, setup(..), salt)`:
///
/// - `salt = keccak256(keccak256(initializer) || uint256(saltNonce))`
/// - `initCode = proxyCreationCode || uint256(uint160(singleton))`
/// - `address = keccak256(0xff || factory || salt || keccak256(initCode))[12..]`
pub fn create2_address(
    deployment: &FactoryDeployment,
    owners: &[Address],
    threshold: u64,
    salt: U256,
) -> Address {
    let initializer = setup_calldata(owners, threshold, deployment.fallback_handler);

    let mut salt_buf = Vec::with_capacity(64);
    salt_buf.extend_from_slice(keccak256(&initializer).as_slice());
    salt_buf.extend_from_slice(&salt.to_be_bytes::<32>());
    let create2_salt = keccak256(&salt_buf);

    let mut init_code = Vec::with_capacity(deployment.proxy_creation_code.len() + 32);
    init_code.extend_from_slice(&deployment.proxy_creation_code);
    let mut singleton_padded = [0u8; 32];
    singleton_padded[12..32].copy_from_slice(deployment.singleton.as_slice());
    init_code.extend_from_slice(&singleton_padded);
    let init_code_hash = keccak256(&init_code);

    let mut buf = Vec::with_capacity(1 + 20 + 32 + 32);
    buf.push(0xff);
    buf.extend_from_slice(deployment.factory.as_slice());
    buf.extend_from_slice(create2_salt.as_slice());
    buf.extend_from_slice(init_code_hash.as_slice());
    Address::from_slice(&keccak256(&buf)[12..])
}

/// Factory calldata that deploys the wallet predicted by [`create2_address`].
pub fn deployment_calldata(
    deployment: &FactoryDeployment,
    owners: &[Address],
    threshold: u64,
    salt: U256,
) -> Bytes {
    ISafeProxyFactory::createProxyWithNonceCall {
        _singleton: deployment.singleton,
        initializer: setup_calldata(owners, threshold, deployment.fallback_handler).into(),
        saltNonce: salt,
    }
    .abi_encode()
    .into()
}

/// `abi.encode(address[] owners, uint256 threshold)`.
pub fn encode_initializer(owners: &[Address], threshold: u64) -> Bytes {
    (owners.to_vec(), U256::from(threshold))
        .abi_encode_params()
        .into()
}

/// Inverse of [`encode_initializer`]; `None` for malformed data or a threshold above `u64`.
pub fn decode_initializer(data: &[u8]) -> Option<(Vec<Address>, u64)> {
    let (owners, threshold) = <(Vec<Address>, U256)>::abi_decode_params(data, true).ok()?;
    Some((owners, u64::try_from(threshold).ok()?))
}
