use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Message reported for any string that is not 40 hex digits.
const ADDRESS_MESSAGE: &str = "Address must be 40 hex numbers";

/// An EVM account address as it crosses the object/host boundary.
///
/// Accepts exactly 40 hex digits, optionally prefixed with `0x`, in any
/// letter case. No EIP-55 checksum is enforced on input; the original
/// string is kept as-is so it round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Validates `address` and wraps it.
    pub fn parse(address: &str) -> Result<Self, SchemaError> {
        validate_address(address)?;
        Ok(Address(address.to_string()))
    }

    /// The address exactly as it was received.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the address carried a `0x` prefix.
    pub fn is_prefixed(&self) -> bool {
        strip_prefix(&self.0).len() != self.0.len()
    }

    /// The 40 hex digits without any prefix.
    pub fn hex_digits(&self) -> &str {
        strip_prefix(&self.0)
    }

    /// Raw 20-byte form.
    pub fn to_bytes(&self) -> [u8; 20] {
        let mut bytes = [0u8; 20];
        // Validated on construction, so decoding cannot fail.
        if let Ok(decoded) = hex::decode(self.hex_digits()) {
            bytes.copy_from_slice(&decoded);
        }
        bytes
    }

    /// EIP-55 mixed-case rendering, always `0x`-prefixed.
    pub fn to_checksum(&self) -> String {
        alloy_primitives::Address::from(self.to_bytes()).to_checksum(None)
    }

    /// Case- and prefix-insensitive comparison.
    pub fn same_account(&self, other: &Address) -> bool {
        self.hex_digits().eq_ignore_ascii_case(other.hex_digits())
    }
}

/// Checks `address` against `^(0x)?[a-f0-9]{40}$`, case-insensitively.
pub fn validate_address(address: &str) -> Result<(), SchemaError> {
    let hex_part = strip_prefix(address);

    if hex_part.len() != 40 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(SchemaError::InvalidAddress(ADDRESS_MESSAGE.into()));
    }

    Ok(())
}

fn strip_prefix(address: &str) -> &str {
    address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .unwrap_or(address)
}

impl TryFrom<String> for Address {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_address(&value)?;
        Ok(Address(value))
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl FromStr for Address {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOWER: &str = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";

    #[test]
    fn accepts_prefixed_lowercase() {
        assert!(Address::parse(LOWER).is_ok());
    }

    #[test]
    fn accepts_missing_prefix() {
        let addr = Address::parse(&LOWER[2..]).unwrap();
        assert!(!addr.is_prefixed());
        assert_eq!(addr.hex_digits(), &LOWER[2..]);
    }

    #[test]
    fn accepts_any_case() {
        assert!(Address::parse("0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED").is_ok());
        // Bad EIP-55 checksum is still a valid address here.
        assert!(Address::parse("0x5AAEB6053F3E94C9b9A09f33669435E7Ef1BeAed").is_ok());
        assert!(Address::parse("0X5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").is_ok());
    }

    #[test]
    fn rejects_short_address() {
        let err = Address::parse("0x5aAeb6053F").unwrap_err();
        assert_eq!(err.to_string(), "invalid address: Address must be 40 hex numbers");
    }

    #[test]
    fn rejects_long_address() {
        assert!(Address::parse(&format!("{LOWER}00")).is_err());
    }

    #[test]
    fn rejects_non_hex_chars() {
        assert!(Address::parse("0xGGGGb6053F3E94C9b9A09f33669435E7Ef1BeAed").is_err());
    }

    #[test]
    fn rejects_double_prefix() {
        assert!(Address::parse("0x0x5aaeb6053f3e94c9b9a09f33669435e7ef1bea").is_err());
    }

    #[test]
    fn checksum_matches_eip55_vector() {
        let addr = Address::parse(LOWER).unwrap();
        assert_eq!(addr.to_checksum(), "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
    }

    #[test]
    fn checksum_of_unprefixed_address() {
        let addr = Address::parse("fb6916095ca1df60bb79ce92ce3ea74c37c5d359").unwrap();
        assert_eq!(addr.to_checksum(), "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359");
    }

    #[test]
    fn same_account_ignores_case_and_prefix() {
        let a = Address::parse(LOWER).unwrap();
        let b = Address::parse("5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED").unwrap();
        assert!(a.same_account(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn serde_roundtrip_keeps_original_text() {
        let json = format!("\"{}\"", "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
        let addr: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(serde_json::to_string(&addr).unwrap(), json);
    }

    #[test]
    fn serde_rejects_invalid_address() {
        assert!(serde_json::from_str::<Address>("\"0xdeadbeef\"").is_err());
    }
}
