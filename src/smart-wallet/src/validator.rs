//! Owner/threshold/chain validation.
//!
//! Pure: no provider lookups. Every check runs so the caller sees all problems at once.

use std::collections::HashMap;

use alloy_primitives::Address;
use smart_wallet_types::WalletConfig;

use crate::{errors::ValidationError, registry::ChainRegistry, utils::parse::parse_address};

/// Validate a configuration given as strings and return the parsed [`WalletConfig`].
pub fn validate_config(
    registry: &ChainRegistry,
    owners: &[String],
    threshold: u64,
    chain_id: u64,
) -> Result<WalletConfig, Vec<ValidationError>> {
    let mut errors = Vec::new();

    if owners.is_empty() {
        errors.push(ValidationError::EmptyOwners);
    }
    if threshold < 1 || threshold > owners.len() as u64 {
        errors.push(ValidationError::ThresholdOutOfRange {
            threshold,
            owners: owners.len(),
        });
    }

    // Duplicates are detected on the parsed bytes, so differently-cased spellings collide.
    let mut parsed = Vec::with_capacity(owners.len());
    let mut seen: HashMap<Address, usize> = HashMap::with_capacity(owners.len());
    for (index, value) in owners.iter().enumerate() {
        match parse_address(value) {
            Ok(address) => {
                if let Some(&first) = seen.get(&address) {
                    errors.push(ValidationError::DuplicateOwner { index, first });
                } else {
                    seen.insert(address, index);
                }
                parsed.push(address);
            }
            Err(_) => errors.push(ValidationError::InvalidOwnerAddress {
                index,
                value: value.clone(),
            }),
        }
    }

    if !registry.is_supported(chain_id) {
        errors.push(ValidationError::UnsupportedChain(chain_id));
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(WalletConfig {
        owners: parsed,
        threshold,
        chain_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
    const B: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";

    fn owners(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn valid_config_is_parsed_in_order() {
        let registry = ChainRegistry::builtin();
        let config = validate_config(&registry, &owners(&[B, A]), 2, 137).unwrap();
        assert_eq!(config.owners[0], parse_address(B).unwrap());
        assert_eq!(config.owners[1], parse_address(A).unwrap());
        assert_eq!(config.threshold, 2);
        assert_eq!(config.chain_id, 137);
    }

    #[test]
    fn empty_owners() {
        let errors = validate_config(&ChainRegistry::builtin(), &[], 1, 1).unwrap_err();
        assert!(errors.contains(&ValidationError::EmptyOwners));
    }

    #[test]
    fn threshold_out_of_range() {
        let registry = ChainRegistry::builtin();
        let errors = validate_config(&registry, &owners(&[A]), 2, 1).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::ThresholdOutOfRange { threshold: 2, owners: 1 }]
        );
        let errors = validate_config(&registry, &owners(&[A]), 0, 1).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::ThresholdOutOfRange { threshold: 0, owners: 1 }]
        );
    }

    #[test]
    fn duplicate_owner_ignores_case() {
        let registry = ChainRegistry::builtin();
        let errors = validate_config(&registry, &owners(&[A, A]), 1, 1).unwrap_err();
        assert_eq!(errors, vec![ValidationError::DuplicateOwner { index: 1, first: 0 }]);

        let lower = A.to_lowercase();
        let errors = validate_config(&registry, &owners(&[A, &lower]), 1, 1).unwrap_err();
        assert_eq!(errors, vec![ValidationError::DuplicateOwner { index: 1, first: 0 }]);
    }

    #[test]
    fn reports_every_problem_at_once() {
        let registry = ChainRegistry::builtin();
        let errors =
            validate_config(&registry, &owners(&["0x1234", A, A]), 5, 999_999).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ThresholdOutOfRange { threshold: 5, owners: 3 },
                ValidationError::InvalidOwnerAddress { index: 0, value: "0x1234".to_string() },
                ValidationError::DuplicateOwner { index: 2, first: 1 },
                ValidationError::UnsupportedChain(999_999),
            ]
        );
    }
}
