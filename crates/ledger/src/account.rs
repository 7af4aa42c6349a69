use airdrop_types::{Address, BuildError};
use sha2::{Digest, Sha256};

const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
const MIN_ADDRESS_LEN: usize = 32;
const MAX_ADDRESS_LEN: usize = 44;

/// Derive the associated token account of `owner` for `mint`.
///
/// Deterministic: the same pair always yields the same account.
pub fn derive_associated_account(owner: &Address, mint: &Address) -> Address {
    let mut hasher = Sha256::new();
    hasher.update(b"associated-token-account");
    hasher.update(owner.as_str().as_bytes());
    hasher.update([0u8]);
    hasher.update(mint.as_str().as_bytes());
    Address::new(hex::encode(hasher.finalize()))
}

/// Check that `address` looks like a base58 encoded public key
pub fn validate_address(address: &Address) -> Result<(), BuildError> {
    let value = address.as_str();
    let invalid = |reason: String| BuildError::InvalidAddress {
        address: value.to_string(),
        reason,
    };

    if value.len() < MIN_ADDRESS_LEN || value.len() > MAX_ADDRESS_LEN {
        return Err(invalid(format!(
            "length {} outside {MIN_ADDRESS_LEN}..={MAX_ADDRESS_LEN}",
            value.len()
        )));
    }

    if let Some(c) = value.chars().find(|c| !BASE58_ALPHABET.contains(*c)) {
        return Err(invalid(format!("character '{c}' is not base58")));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: &str = "4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T";
    const MINT: &str = "EtUtjntdnndwLrXKNgwWKyfSCsuy3thP4pr5vqxtWA1m";

    #[test]
    fn test_derivation_is_deterministic() {
        let a = derive_associated_account(&Address::from(OWNER), &Address::from(MINT));
        let b = derive_associated_account(&Address::from(OWNER), &Address::from(MINT));
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);
    }

    #[test]
    fn test_derivation_depends_on_mint() {
        let a = derive_associated_account(&Address::from(OWNER), &Address::from(MINT));
        let b = derive_associated_account(&Address::from(MINT), &Address::from(OWNER));
        assert_ne!(a, b);
    }

    #[test]
    fn test_validate_address() {
        assert!(validate_address(&Address::from(OWNER)).is_ok());
        assert!(validate_address(&Address::from(MINT)).is_ok());

        let short = validate_address(&Address::from("abc")).unwrap_err();
        assert!(matches!(short, BuildError::InvalidAddress { .. }));

        let bad_char = validate_address(&Address::from(
            "0Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T",
        ))
        .unwrap_err();
        assert!(bad_char.to_string().contains("'0'"));
    }
}
