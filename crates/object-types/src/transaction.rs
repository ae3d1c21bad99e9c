use std::fmt;
use std::num::{NonZeroU32, NonZeroU64};

use serde::{Deserialize, Serialize};

use crate::address::Address;

/// A settled transfer as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub timestamp: NonZeroU64,
    pub hash: String,
    pub token: TransactionAmount,
    pub to: Address,
    pub from: Address,
    pub fee: TransactionAmount,
}

/// Value or fee of a [`Transaction`]. The amount is kept as the host's
/// display string rather than parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionAmount {
    pub amount: String,
    pub symbol: String,
    pub decimals: NonZeroU32,
}

/// Lifecycle state of a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionState {
    Unknown,
    Pending,
    Reverted,
    Success,
}

impl TransactionState {
    /// Whether the transaction has reached a final state.
    pub fn is_final(&self) -> bool {
        matches!(self, TransactionState::Reverted | TransactionState::Success)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionState::Unknown => "unknown",
            TransactionState::Pending => "pending",
            TransactionState::Reverted => "reverted",
            TransactionState::Success => "success",
        }
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn sample() -> Value {
        json!({
            "timestamp": 1_700_000_000_000u64,
            "hash": "0xabc",
            "token": {"amount": "1.5", "symbol": "xDAI", "decimals": 18},
            "to": "0x000000000000000000000000000000000000dEaD",
            "from": "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed",
            "fee": {"amount": "0.0001", "symbol": "xDAI", "decimals": 18}
        })
    }

    #[test]
    fn parses_complete_transaction() {
        let tx: Transaction = serde_json::from_value(sample()).unwrap();
        assert_eq!(tx.hash, "0xabc");
        assert_eq!(tx.token.symbol, "xDAI");
        assert_eq!(tx.fee.amount, "0.0001");
    }

    #[test]
    fn rejects_missing_hash() {
        let mut value = sample();
        value.as_object_mut().unwrap().remove("hash");
        assert!(serde_json::from_value::<Transaction>(value).is_err());
    }

    #[test]
    fn rejects_zero_timestamp() {
        let mut value = sample();
        value["timestamp"] = json!(0);
        assert!(serde_json::from_value::<Transaction>(value).is_err());
    }

    #[test]
    fn rejects_numeric_token_amount() {
        let mut value = sample();
        value["token"]["amount"] = json!(15);
        assert!(serde_json::from_value::<Transaction>(value).is_err());
    }

    #[test]
    fn rejects_invalid_recipient() {
        let mut value = sample();
        value["to"] = json!("dead");
        assert!(serde_json::from_value::<Transaction>(value).is_err());
    }

    #[test]
    fn state_uses_lowercase_names() {
        let state: TransactionState = serde_json::from_value(json!("reverted")).unwrap();
        assert_eq!(state, TransactionState::Reverted);
        assert_eq!(serde_json::to_value(TransactionState::Pending).unwrap(), json!("pending"));
    }

    #[test]
    fn state_rejects_unknown_name() {
        assert!(serde_json::from_value::<TransactionState>(json!("failed")).is_err());
        assert!(serde_json::from_value::<TransactionState>(json!("Success")).is_err());
    }

    #[test]
    fn final_states() {
        assert!(TransactionState::Success.is_final());
        assert!(TransactionState::Reverted.is_final());
        assert!(!TransactionState::Pending.is_final());
        assert!(!TransactionState::Unknown.is_final());
    }
}
