use thiserror::Error;

/// Length of a transaction hash in hex characters.
pub const TX_HASH_LEN: usize = 64;

const MIN_ADDRESS_TAIL: usize = 25;
const MAX_ADDRESS_TAIL: usize = 39;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("invalid Bitcoin address format: {0}")]
    InvalidBitcoinAddress(String),

    #[error("hash length not valid - accepting only 64 chars as hash (got {0})")]
    InvalidHashLength(usize),
}

/// Checks the shape of a legacy (P2PKH/P2SH) or bech32 address.
///
/// The tail after the prefix is 25 to 39 characters. Legacy addresses use the
/// base58 alphabet; bech32 tails accept any alphanumeric except `I` and `O`.
/// No checksum is verified.
pub fn validate_bitcoin_address(address: &str) -> Result<(), ValidationError> {
    if address.trim().is_empty() {
        return Err(ValidationError::MissingParameter("address".to_string()));
    }

    let (tail, bech32) = if let Some(tail) = address.strip_prefix("bc1") {
        (tail, true)
    } else if let Some(tail) = address.strip_prefix('1').or_else(|| address.strip_prefix('3')) {
        (tail, false)
    } else {
        return Err(ValidationError::InvalidBitcoinAddress(address.to_string()));
    };

    let tail_len = tail.chars().count();
    let alphabet_ok = if bech32 {
        tail.chars().all(is_bech32_safe)
    } else {
        tail.chars().all(is_base58)
    };
    if !(MIN_ADDRESS_TAIL..=MAX_ADDRESS_TAIL).contains(&tail_len) || !alphabet_ok {
        return Err(ValidationError::InvalidBitcoinAddress(address.to_string()));
    }

    Ok(())
}

pub fn validate_transaction_hash(hash: &str) -> Result<(), ValidationError> {
    let len = hash.chars().count();
    if len != TX_HASH_LEN {
        return Err(ValidationError::InvalidHashLength(len));
    }
    Ok(())
}

fn is_base58(c: char) -> bool {
    c.is_ascii_alphanumeric() && !matches!(c, '0' | 'O' | 'I' | 'l')
}

fn is_bech32_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() && !matches!(c, 'O' | 'I')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_addresses() {
        for address in [
            "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa",
            "3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy",
            "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq",
        ] {
            assert_eq!(validate_bitcoin_address(address), Ok(()), "{address}");
        }
    }

    #[test]
    fn rejects_bad_prefix_and_length() {
        assert!(validate_bitcoin_address("2A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa").is_err());
        assert!(validate_bitcoin_address("1A1zP1eP5QGefi2DMPTfTL5S").is_err());
        assert!(validate_bitcoin_address(&format!("1{}", "a".repeat(40))).is_err());
        assert!(validate_bitcoin_address(&format!("bc1{}", "q".repeat(40))).is_err());
        assert_eq!(
            validate_bitcoin_address("  "),
            Err(ValidationError::MissingParameter("address".to_string()))
        );
    }

    #[test]
    fn legacy_addresses_use_base58_alphabet() {
        let base = "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfN";
        for bad in ['0', 'O', 'I', 'l', '-', 'é'] {
            let candidate = format!("{base}{bad}");
            assert!(validate_bitcoin_address(&candidate).is_err(), "{candidate}");
        }
    }

    #[test]
    fn bech32_tail_allows_zero_and_lowercase_l() {
        assert!(validate_bitcoin_address("bc1q0l0l0l0l0l0l0l0l0l0l0l0l0l0l").is_ok());
        assert!(validate_bitcoin_address("bc1qOl0l0l0l0l0l0l0l0l0l0l0l0l0l").is_err());
    }

    #[test]
    fn hash_must_be_64_chars() {
        assert!(validate_transaction_hash(&"a".repeat(64)).is_ok());
        assert_eq!(
            validate_transaction_hash(&"a".repeat(63)),
            Err(ValidationError::InvalidHashLength(63))
        );
        assert!(validate_transaction_hash("").is_err());
        assert!(validate_transaction_hash(&"a".repeat(65)).is_err());
    }
}
