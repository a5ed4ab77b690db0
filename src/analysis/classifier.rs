//! Transfer direction relative to the wallet under analysis

use serde::{Deserialize, Serialize};

use crate::analysis::types::{NativeTransfer, TokenTransfer};
use crate::error::{Error, Result};

lazy_static::lazy_static! {
    static ref SOLANA_ADDRESS: regex::Regex =
        regex::Regex::new(r"^[1-9A-HJ-NP-Za-km-z]{32,44}$").expect("static regex");
}

/// Accepted encodings for the subject wallet address
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressFormat {
    /// Base58 public key, 32-44 characters
    #[default]
    Solana,
    /// Any non-empty token without whitespace
    Opaque,
}

/// Validated wallet address used for case-insensitive matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectAddress {
    original: String,
    folded: String,
}

impl SubjectAddress {
    /// Validate `address` against `format`
    pub fn parse(address: &str, format: AddressFormat) -> Result<Self> {
        let trimmed = address.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidAddress(address.to_string()));
        }

        let valid = match format {
            AddressFormat::Solana => SOLANA_ADDRESS.is_match(trimmed),
            AddressFormat::Opaque => !trimmed.chars().any(char::is_whitespace),
        };
        if !valid {
            return Err(Error::InvalidAddress(address.to_string()));
        }

        Ok(Self {
            original: trimmed.to_string(),
            folded: trimmed.to_lowercase(),
        })
    }

    /// Address as supplied (trimmed)
    pub fn as_str(&self) -> &str {
        &self.original
    }

    /// Case-insensitive equality with another address
    pub fn matches(&self, other: &str) -> bool {
        // Fast path for ASCII, which covers every base58 address
        if other.is_ascii() {
            return other.eq_ignore_ascii_case(&self.folded);
        }
        other.to_lowercase() == self.folded
    }
}

impl std::fmt::Display for SubjectAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.original)
    }
}

/// A value movement between two accounts
pub trait Transfer {
    fn sender(&self) -> &str;
    fn recipient(&self) -> &str;
}

impl Transfer for NativeTransfer {
    fn sender(&self) -> &str {
        &self.from
    }

    fn recipient(&self) -> &str {
        &self.to
    }
}

impl Transfer for TokenTransfer {
    fn sender(&self) -> &str {
        &self.from
    }

    fn recipient(&self) -> &str {
        &self.to
    }
}

/// True when the subject is the sender of `transfer`
pub fn is_outbound<T: Transfer + ?Sized>(transfer: &T, subject: &SubjectAddress) -> bool {
    subject.matches(transfer.sender())
}

/// True when the subject is the recipient of `transfer`
pub fn is_inbound<T: Transfer + ?Sized>(transfer: &T, subject: &SubjectAddress) -> bool {
    subject.matches(transfer.recipient())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALLET: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";
    const OTHER: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";

    fn native(from: &str, to: &str, amount: u64) -> NativeTransfer {
        NativeTransfer {
            from: from.to_string(),
            to: to.to_string(),
            amount,
        }
    }

    #[test]
    fn test_parse_solana_address() {
        let subject = SubjectAddress::parse(WALLET, AddressFormat::Solana).unwrap();
        assert_eq!(subject.as_str(), WALLET);

        // Surrounding whitespace is tolerated
        let padded = format!("  {}\n", WALLET);
        assert!(SubjectAddress::parse(&padded, AddressFormat::Solana).is_ok());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let too_long = "1".repeat(45);
        for bad in ["", "   ", "W1", "0OIl0OIl0OIl0OIl0OIl0OIl0OIl0OIl", too_long.as_str()] {
            let err = SubjectAddress::parse(bad, AddressFormat::Solana).unwrap_err();
            assert!(matches!(err, Error::InvalidAddress(_)), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_parse_opaque_address() {
        assert!(SubjectAddress::parse("W1", AddressFormat::Opaque).is_ok());
        assert!(SubjectAddress::parse("", AddressFormat::Opaque).is_err());
        assert!(SubjectAddress::parse("W 1", AddressFormat::Opaque).is_err());
    }

    #[test]
    fn test_direction_is_case_insensitive() {
        let subject = SubjectAddress::parse(WALLET, AddressFormat::Solana).unwrap();
        let out = native(&WALLET.to_uppercase(), OTHER, 10);
        let inbound = native(OTHER, &WALLET.to_lowercase(), 10);

        assert!(is_outbound(&out, &subject));
        assert!(!is_inbound(&out, &subject));
        assert!(is_inbound(&inbound, &subject));
        assert!(!is_outbound(&inbound, &subject));
    }

    #[test]
    fn test_token_transfer_direction() {
        let subject = SubjectAddress::parse(WALLET, AddressFormat::Solana).unwrap();
        let transfer = TokenTransfer {
            from: WALLET.to_string(),
            to: OTHER.to_string(),
            amount: 1_000.0,
            mint: "So11111111111111111111111111111111111111112".to_string(),
        };
        assert!(is_outbound(&transfer, &subject));
        assert!(!is_inbound(&transfer, &subject));
    }
}
