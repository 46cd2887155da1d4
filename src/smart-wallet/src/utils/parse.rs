//! Parsing of the plain string values the library accepts from collaborators.

use alloy_primitives::{Address, Bytes, B256, U256};

use crate::errors::WalletError;

/// Parse a 20-byte address written as 40 hex digits with an optional `0x` prefix.
///
/// All-lowercase and all-uppercase input is accepted as-is. Mixed case is treated as an
/// EIP-55 checksum and must match it exactly.
pub fn parse_address(value: &str) -> Result<Address, WalletError> {
    let invalid = || WalletError::InvalidAddress(value.to_string());

    let body = strip_hex_prefix(value);
    if body.len() != 40 || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let mut raw = [0u8; 20];
    hex::decode_to_slice(body, &mut raw).map_err(|_| invalid())?;
    let address = Address::from(raw);

    let has_lower = body.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = body.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper && address.to_checksum(None)[2..] != *body {
        return Err(invalid());
    }
    Ok(address)
}

/// Canonical (EIP-55) rendering of `value`.
pub fn to_checksum_address(value: &str) -> Result<String, WalletError> {
    parse_address(value).map(|address| address.to_checksum(None))
}

/// Parse an arbitrary-precision non-negative decimal integer.
pub fn parse_amount(value: &str) -> Result<U256, WalletError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(WalletError::InvalidAmount(value.to_string()));
    }
    U256::from_str_radix(value, 10).map_err(|_| WalletError::InvalidAmount(value.to_string()))
}

/// Parse hex call data; `""` and `"0x"` are empty.
pub fn parse_hex(value: &str) -> Result<Bytes, WalletError> {
    hex::decode(strip_hex_prefix(value))
        .map(Bytes::from)
        .map_err(|_| WalletError::InvalidHex(value.to_string()))
}

/// Parse a 32-byte digest.
pub fn parse_digest(value: &str) -> Result<B256, WalletError> {
    let bytes = parse_hex(value)?;
    if bytes.len() != 32 {
        return Err(WalletError::InvalidHex(value.to_string()));
    }
    Ok(B256::from_slice(&bytes))
}

fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    // EIP-55 reference vectors.
    const CHECKSUMMED: [&str; 4] = [
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
        "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
    ];

    #[test]
    fn accepts_checksummed_addresses() {
        for value in CHECKSUMMED {
            let address = parse_address(value).unwrap();
            assert_eq!(address.to_checksum(None), value);
        }
    }

    #[test]
    fn accepts_single_case_and_missing_prefix() {
        let lower = CHECKSUMMED[0].to_lowercase();
        let upper = format!("0x{}", CHECKSUMMED[0][2..].to_uppercase());
        let bare = &CHECKSUMMED[0][2..];
        let expected = parse_address(CHECKSUMMED[0]).unwrap();
        assert_eq!(parse_address(&lower).unwrap(), expected);
        assert_eq!(parse_address(&upper).unwrap(), expected);
        assert_eq!(parse_address(bare).unwrap(), expected);
    }

    #[test]
    fn rejects_bad_checksum() {
        // flip the case of the first letter
        let bad = "0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
        assert!(matches!(parse_address(bad), Err(WalletError::InvalidAddress(_))));
    }

    #[test]
    fn rejects_wrong_length_and_non_hex() {
        assert!(parse_address("0x1234").is_err());
        assert!(parse_address("").is_err());
        assert!(parse_address("0xzz0000000000000000000000000000000000000000").is_err());
        assert!(parse_address(&format!("{}00", CHECKSUMMED[1])).is_err());
    }

    #[test]
    fn checksum_rendering_is_canonical() {
        let lower = CHECKSUMMED[3].to_lowercase();
        assert_eq!(to_checksum_address(&lower).unwrap(), CHECKSUMMED[3]);
    }

    #[test]
    fn amounts_are_decimal_only() {
        assert_eq!(parse_amount("0").unwrap(), U256::ZERO);
        assert_eq!(
            parse_amount("1000000000000000000").unwrap(),
            U256::from(1_000_000_000_000_000_000u64)
        );
        assert_eq!(parse_amount(&U256::MAX.to_string()).unwrap(), U256::MAX);
        assert!(parse_amount("").is_err());
        assert!(parse_amount("-1").is_err());
        assert!(parse_amount("0x10").is_err());
        assert!(parse_amount("1.5").is_err());
        // one past U256::MAX
        assert!(parse_amount(
            "115792089237316195423570985008687907853269984665640564039457584007913129639936"
        )
        .is_err());
    }

    #[test]
    fn hex_and_digest_parsing() {
        assert!(parse_hex("0x").unwrap().is_empty());
        assert_eq!(parse_hex("0xa9059cbb").unwrap().as_ref(), &[0xa9, 0x05, 0x9c, 0xbb]);
        assert!(parse_hex("0xabc").is_err());
        assert!(parse_digest("0x1234").is_err());
        let digest = format!("0x{}", "ab".repeat(32));
        assert_eq!(parse_digest(&digest).unwrap(), B256::repeat_byte(0xab));
    }
}
