//! Value objects shared between a sandboxed object and its host.
//!
//! This crate provides:
//! - `Address` validation (40 hex digits, optional `0x` prefix, any case)
//! - `Token`, `User`, `Transaction` and `TransactionState` wire contracts
//! - Decimal-string encoding for arbitrary-precision token amounts
//! - The data message and context snapshot types relayed by the host
//!
//! Every type deserializes through serde, so parsing a payload with
//! `serde_json::from_value` is also its schema check.

pub mod address;
pub mod amount;
pub mod error;
pub mod message;
pub mod state;
pub mod token;
pub mod transaction;
pub mod user;

pub use address::Address;
pub use amount::Amount;
pub use error::SchemaError;
pub use message::DataMessage;
pub use state::{ContextProps, ObjectState};
pub use token::Token;
pub use transaction::{Transaction, TransactionAmount, TransactionState};
pub use user::User;

/// Any JSON-serializable value (store contents, data message payloads).
pub type JsonValue = serde_json::Value;
