use serde_json::Value;
use thiserror::Error;

/// Failures of a capability call or of the bridge itself.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The host answered, but the payload failed its schema check.
    #[error("invalid response to {function}: {reason}")]
    InvalidResponse { function: String, reason: String },

    /// The host side could not decode an object's request.
    #[error("invalid request to {function}: {reason}")]
    InvalidRequest { function: String, reason: String },

    #[error("unsupported capability: {0}")]
    UnsupportedCapability(String),

    #[error("{function} call {id} timed out")]
    Timeout { function: String, id: String },

    #[error("protocol error: {0}")]
    Protocol(String),

    /// Bad target origin or bridge settings.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The host answered with a tagged error result.
    #[error("host rejected {function}: {value}")]
    Rejected { function: String, value: Value },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("encoding error: {0}")]
    Encode(String),

    /// The bridge was stopped (or dropped) before the call completed.
    #[error("bridge stopped")]
    Stopped,
}

impl BridgeError {
    pub(crate) fn invalid_response(function: &str, reason: impl ToString) -> Self {
        BridgeError::InvalidResponse {
            function: function.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn invalid_request(function: &str, reason: impl ToString) -> Self {
        BridgeError::InvalidRequest {
            function: function.to_string(),
            reason: reason.to_string(),
        }
    }
}
