use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::amount::Amount;

/// A token balance or transfer value as exchanged with the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub name: String,
    pub symbol: String,
    pub amount: Amount,
    pub decimals: NonZeroU32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Contract address; absent for the chain's native token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl Token {
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        amount: Amount,
        decimals: NonZeroU32,
    ) -> Self {
        Token {
            name: name.into(),
            symbol: symbol.into(),
            amount,
            decimals,
            image: None,
            address: None,
        }
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Whether this is the chain's native token (no contract address).
    pub fn is_native(&self) -> bool {
        self.address.is_none()
    }
}
