use thiserror::Error;

/// Schema validation errors for values crossing the object/host boundary.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}
