use std::fmt;
use std::str::FromStr;

use alloy_primitives::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SchemaError;

/// A strictly positive token amount in base units.
///
/// JSON has no big integers, so amounts travel as decimal strings. A plain
/// non-negative JSON integer is also accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(U256);

impl Amount {
    /// Wraps `value`, rejecting zero.
    pub fn new(value: U256) -> Result<Self, SchemaError> {
        if value.is_zero() {
            return Err(SchemaError::InvalidAmount("amount must be positive".into()));
        }
        Ok(Amount(value))
    }

    pub fn value(&self) -> U256 {
        self.0
    }
}

impl From<Amount> for U256 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl TryFrom<u64> for Amount {
    type Error = SchemaError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Amount::new(U256::from(value))
    }
}

impl FromStr for Amount {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SchemaError::InvalidAmount(format!(
                "expected a decimal integer, got {s:?}"
            )));
        }
        let value = U256::from_str_radix(s, 10)
            .map_err(|e| SchemaError::InvalidAmount(format!("{s}: {e}")))?;
        Amount::new(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountRepr {
    Text(String),
    Number(u64),
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parsed = match AmountRepr::deserialize(deserializer)? {
            AmountRepr::Text(text) => text.parse(),
            AmountRepr::Number(number) => Amount::try_from(number),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}
