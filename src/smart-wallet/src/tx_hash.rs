//! Canonical hash of a wallet transaction: the digest every owner signs.
//!
//! Follows the Safe EIP-712 layout so digests match what the deployed wallet checks:
//!
//! `keccak256(0x19 || 0x01 || domainSeparator(chainId, wallet) || safeTxStructHash(tx, nonce))`
//!
//! Field order is fixed. Binding the wallet and chain through the domain separator means a
//! signature for one wallet/chain never authorises another.

use alloy_primitives::{b256, Address, Bytes, B256, U256};
use alloy_sol_types::SolCall;
use smart_wallet_types::{interfaces::ISafe, WalletTransaction};

use crate::utils::crypto::keccak256;

/// keccak256 of the `SafeTx` type string:
///
/// `SafeTx(address to,uint256 value,bytes data,uint8 operation,uint256 safeTxGas,`
/// `uint256 baseGas,uint256 gasPrice,address gasToken,address refundReceiver,uint256 nonce)`
pub const SAFE_TX_TYPEHASH: B256 =
    b256!("bb8310d486368db6bd6f849402fdd73ad53d316b5a4b2644ad6efe0f941286d8");

/// keccak256("EIP712Domain(uint256 chainId,address verifyingContract)")
pub const DOMAIN_SEPARATOR_TYPEHASH: B256 =
    b256!("47e79534a245952e8b16893a336b85a3d9ea9fa8c573f3d803afb92a79469218");

fn address_word(address: Address) -> [u8; 32] {
    let mut padded = [0u8; 32];
    padded[12..32].copy_from_slice(address.as_slice());
    padded
}

pub fn domain_separator(chain_id: u64, wallet: Address) -> B256 {
    let mut buf = Vec::with_capacity(32 * 3);
    buf.extend_from_slice(DOMAIN_SEPARATOR_TYPEHASH.as_slice());
    buf.extend_from_slice(&U256::from(chain_id).to_be_bytes::<32>());
    buf.extend_from_slice(&address_word(wallet));
    keccak256(&buf)
}

/// EIP-712 struct hash of `tx` at `nonce`.
pub fn safe_tx_struct_hash(tx: &WalletTransaction, nonce: U256) -> B256 {
    // Hash the call data so the typed message stays fixed-size.
    let data_hash = keccak256(&tx.data);

    let mut buf = Vec::with_capacity(32 * 11);
    buf.extend_from_slice(SAFE_TX_TYPEHASH.as_slice());
    buf.extend_from_slice(&address_word(tx.to));
    buf.extend_from_slice(&tx.value.to_be_bytes::<32>());
    buf.extend_from_slice(data_hash.as_slice());
    let mut operation = [0u8; 32];
    operation[31] = tx.operation.as_u8();
    buf.extend_from_slice(&operation);
    buf.extend_from_slice(&tx.safe_tx_gas.to_be_bytes::<32>());
    buf.extend_from_slice(&tx.base_gas.to_be_bytes::<32>());
    buf.extend_from_slice(&tx.gas_price.to_be_bytes::<32>());
    buf.extend_from_slice(&address_word(tx.gas_token));
    buf.extend_from_slice(&address_word(tx.refund_receiver));
    buf.extend_from_slice(&nonce.to_be_bytes::<32>());
    keccak256(&buf)
}

/// The 66-byte pre-image the wallet hashes (`encodeTransactionData`).
pub fn encode_transaction_data(
    wallet: Address,
    tx: &WalletTransaction,
    nonce: U256,
    chain_id: u64,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(2 + 32 + 32);
    buf.extend_from_slice(b"\x19\x01");
    buf.extend_from_slice(domain_separator(chain_id, wallet).as_slice());
    buf.extend_from_slice(safe_tx_struct_hash(tx, nonce).as_slice());
    buf
}

/// Digest owners sign to authorise `tx` on `wallet` at `nonce`.
pub fn transaction_hash(
    wallet: Address,
    tx: &WalletTransaction,
    nonce: U256,
    chain_id: u64,
) -> B256 {
    keccak256(&encode_transaction_data(wallet, tx, nonce, chain_id))
}

/// `execTransaction` calldata for `tx` with already packed owner signatures.
pub fn exec_transaction_calldata(tx: &WalletTransaction, signatures: Bytes) -> Bytes {
    ISafe::execTransactionCall {
        to: tx.to,
        value: tx.value,
        data: tx.data.clone(),
        operation: tx.operation.as_u8(),
        safeTxGas: tx.safe_tx_gas,
        baseGas: tx.base_gas,
        gasPrice: tx.gas_price,
        gasToken: tx.gas_token,
        refundReceiver: tx.refund_receiver,
        signatures,
    }
    .abi_encode()
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use smart_wallet_types::Operation;

    fn wallet() -> Address {
        Address::repeat_byte(0x5a)
    }

    fn transfer() -> WalletTransaction {
        WalletTransaction::call(
            Address::repeat_byte(0x70),
            U256::from(1_000_000_000_000_000u64),
            Bytes::from(vec![0xa9, 0x05, 0x9c, 0xbb]),
        )
    }

    #[test]
    fn typehashes_match_their_type_strings() {
        assert_eq!(
            keccak256(concat!(
                "SafeTx(address to,uint256 value,bytes data,uint8 operation,",
                "uint256 safeTxGas,uint256 baseGas,uint256 gasPrice,",
                "address gasToken,address refundReceiver,uint256 nonce)"
            )
            .as_bytes()),
            SAFE_TX_TYPEHASH
        );
        assert_eq!(
            keccak256(b"EIP712Domain(uint256 chainId,address verifyingContract)"),
            DOMAIN_SEPARATOR_TYPEHASH
        );
    }

    #[test]
    fn known_digest_plain_call() {
        let nonce = U256::from(4u64);
        assert_eq!(
            domain_separator(1, wallet()),
            b256!("680307958aa4f4ba71bb13d4643a62dbaee808ddaf5ceba53514fbd6c1a89a26")
        );
        assert_eq!(
            safe_tx_struct_hash(&transfer(), nonce),
            b256!("81c92dc83f85e5e5cffcf397cfe274b00e33ebd407f2baf794026a6842688045")
        );
        assert_eq!(
            transaction_hash(wallet(), &transfer(), nonce, 1),
            b256!("c0eee911025c825dc3e0e3c1615151e9e887c18cfbc76fb467d92625cb9d27cb")
        );
    }

    #[test]
    fn known_digest_with_gas_and_refund() {
        // distinct values in every slot so a reordered field cannot collide
        let tx = transfer()
            .with_operation(Operation::DelegateCall)
            .with_gas(U256::from(50_000u64), U256::from(21_000u64), U256::from(3u64))
            .with_refund(Address::repeat_byte(0x11), Address::repeat_byte(0x22));
        let nonce = U256::from(4u64);
        assert_eq!(
            domain_separator(137, wallet()),
            b256!("2f6b4bf53854fd75dcd46e19dc1c99b41d3ba2e6aa84bd0ab2761388e5182340")
        );
        assert_eq!(
            safe_tx_struct_hash(&tx, nonce),
            b256!("890ad0942b2d43480189dfe23b3c8edbd2239c3d1bac2953b4596db5abf2cb7e")
        );
        assert_eq!(
            transaction_hash(wallet(), &tx, nonce, 137),
            b256!("abf1c67daa6308adc67e27d48de20434482dc997bb33287e7f3e13861fa1a5d9")
        );
    }

    #[test]
    fn preimage_layout() {
        let encoded = encode_transaction_data(wallet(), &transfer(), U256::from(4u64), 1);
        assert_eq!(encoded.len(), 66);
        assert_eq!(&encoded[..2], b"\x19\x01");
        assert_eq!(&encoded[2..34], domain_separator(1, wallet()).as_slice());
        assert_eq!(&encoded[34..], safe_tx_struct_hash(&transfer(), U256::from(4u64)).as_slice());
    }

    #[test]
    fn hash_is_reproducible() {
        let a = transaction_hash(wallet(), &transfer(), U256::from(4u64), 1);
        let b = transaction_hash(wallet(), &transfer().clone(), U256::from(4u64), 1);
        assert_eq!(a, b);
    }

    #[test]
    fn every_field_changes_the_digest() {
        let nonce = U256::from(4u64);
        let base = transaction_hash(wallet(), &transfer(), nonce, 1);
        let one = U256::from(1u64);

        let mut variants = Vec::new();
        let mut tx = transfer();
        tx.to = Address::repeat_byte(0x71);
        variants.push(tx);
        let mut tx = transfer();
        tx.value += one;
        variants.push(tx);
        let mut tx = transfer();
        tx.data = Bytes::from(vec![0xa9, 0x05, 0x9c, 0xbc]);
        variants.push(tx);
        variants.push(transfer().with_operation(Operation::DelegateCall));
        variants.push(transfer().with_gas(one, U256::ZERO, U256::ZERO));
        variants.push(transfer().with_gas(U256::ZERO, one, U256::ZERO));
        variants.push(transfer().with_gas(U256::ZERO, U256::ZERO, one));
        variants.push(transfer().with_refund(Address::repeat_byte(0x01), Address::ZERO));
        variants.push(transfer().with_refund(Address::ZERO, Address::repeat_byte(0x01)));

        for tx in &variants {
            assert_ne!(transaction_hash(wallet(), tx, nonce, 1), base, "{tx:?}");
        }
        assert_ne!(transaction_hash(wallet(), &transfer(), nonce + one, 1), base);
        assert_ne!(transaction_hash(wallet(), &transfer(), nonce, 10), base);
        assert_ne!(transaction_hash(Address::repeat_byte(0x5b), &transfer(), nonce, 1), base);
    }

    #[test]
    fn exec_calldata_round_trips() {
        let signatures = Bytes::from(vec![0x11; 65]);
        let calldata = exec_transaction_calldata(&transfer(), signatures.clone());
        let call = ISafe::execTransactionCall::abi_decode(&calldata, true).unwrap();
        assert_eq!(call.to, transfer().to);
        assert_eq!(call.value, transfer().value);
        assert_eq!(call.operation, 0);
        assert_eq!(call.signatures, signatures);
    }
}
