//! Host side of the protocol: decoding object requests and answering them.
//!
//! ```ignore
//! if let Some(reply) = serve_request(&wallet, &event_data).await {
//!     iframe.post(serde_json::to_value(reply)?);
//! }
//! ```

use async_trait::async_trait;
use object_types::{Address, Token};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::BridgeError;
use crate::protocol::{functions, HostMessage, ObjectMessage, ResponseResult};

/// A decoded object request.
#[derive(Debug, Clone, PartialEq)]
pub enum HostRequest {
    GetTransaction { tx_hash: String },
    GetTransactionState { tx_hash: String },
    WaitForTransaction { tx_hash: String },
    CheckBalance { token: Token },
    SendTransaction { to: Address, token: Token },
    EstimateTransaction { to: Address, token: Token },
    RpcRequest { method: String, params: Value },
    Send { data: Value },
    UpdateStore { store: Value },
    OnViewChange { view: String },
}

impl HostRequest {
    /// Decodes `function` and its string arguments, validating tokens,
    /// addresses and JSON payloads.
    pub fn parse(function: &str, args: &[String]) -> Result<Self, BridgeError> {
        let request = match function {
            functions::GET_TRANSACTION => HostRequest::GetTransaction {
                tx_hash: text_arg(function, args, 0)?,
            },
            functions::GET_TRANSACTION_STATE => HostRequest::GetTransactionState {
                tx_hash: text_arg(function, args, 0)?,
            },
            functions::WAIT_FOR_TRANSACTION => HostRequest::WaitForTransaction {
                tx_hash: text_arg(function, args, 0)?,
            },
            functions::CHECK_BALANCE => HostRequest::CheckBalance {
                token: json_arg(function, args, 0)?,
            },
            functions::SEND_TRANSACTION => HostRequest::SendTransaction {
                to: address_arg(function, args, 0)?,
                token: json_arg(function, args, 1)?,
            },
            functions::ESTIMATE_TRANSACTION => HostRequest::EstimateTransaction {
                to: address_arg(function, args, 0)?,
                token: json_arg(function, args, 1)?,
            },
            functions::RPC_REQUEST => HostRequest::RpcRequest {
                method: text_arg(function, args, 0)?,
                params: json_arg(function, args, 1)?,
            },
            functions::SEND => HostRequest::Send {
                data: json_arg(function, args, 0)?,
            },
            functions::UPDATE_STORE => HostRequest::UpdateStore {
                store: json_arg(function, args, 0)?,
            },
            functions::ON_VIEW_CHANGE => HostRequest::OnViewChange {
                view: text_arg(function, args, 0)?,
            },
            other => return Err(BridgeError::UnsupportedCapability(other.to_string())),
        };
        Ok(request)
    }

    /// Wire name of this request.
    pub fn function(&self) -> &'static str {
        match self {
            HostRequest::GetTransaction { .. } => functions::GET_TRANSACTION,
            HostRequest::GetTransactionState { .. } => functions::GET_TRANSACTION_STATE,
            HostRequest::WaitForTransaction { .. } => functions::WAIT_FOR_TRANSACTION,
            HostRequest::CheckBalance { .. } => functions::CHECK_BALANCE,
            HostRequest::SendTransaction { .. } => functions::SEND_TRANSACTION,
            HostRequest::EstimateTransaction { .. } => functions::ESTIMATE_TRANSACTION,
            HostRequest::RpcRequest { .. } => functions::RPC_REQUEST,
            HostRequest::Send { .. } => functions::SEND,
            HostRequest::UpdateStore { .. } => functions::UPDATE_STORE,
            HostRequest::OnViewChange { .. } => functions::ON_VIEW_CHANGE,
        }
    }
}

fn raw_arg<'a>(function: &str, args: &'a [String], index: usize) -> Result<&'a str, BridgeError> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| BridgeError::invalid_request(function, format!("missing argument {index}")))
}

fn text_arg(function: &str, args: &[String], index: usize) -> Result<String, BridgeError> {
    raw_arg(function, args, index).map(str::to_string)
}

fn address_arg(function: &str, args: &[String], index: usize) -> Result<Address, BridgeError> {
    Address::parse(raw_arg(function, args, index)?)
        .map_err(|e| BridgeError::invalid_request(function, e))
}

fn json_arg<T: DeserializeOwned>(function: &str, args: &[String], index: usize) -> Result<T, BridgeError> {
    serde_json::from_str(raw_arg(function, args, index)?)
        .map_err(|e| BridgeError::invalid_request(function, format!("argument {index}: {e}")))
}

/// Answers object requests. `Err` values are sent back as tagged error
/// results.
#[async_trait]
pub trait HostHandler: Send + Sync {
    async fn handle(&self, request: HostRequest) -> Result<Value, Value>;
}

/// Answers one inbound object message.
///
/// Returns the response to post back for `adapter` requests, and `None`
/// for anything else (`init`, `window-size`, foreign traffic). Requests that
/// fail to decode are answered with an error result so the object's call
/// does not hang.
pub async fn serve_request<H: HostHandler + ?Sized>(handler: &H, data: &Value) -> Option<HostMessage> {
    let (function, id, args) = match ObjectMessage::deserialize(data) {
        Ok(ObjectMessage::Adapter { function, id, args }) => (function, id, args),
        Ok(_) => return None,
        Err(e) => {
            debug!(error = %e, "not an object request");
            return None;
        }
    };

    let result = match HostRequest::parse(&function, &args) {
        Ok(request) => match handler.handle(request).await {
            Ok(value) => ResponseResult::Success(value),
            Err(value) => ResponseResult::Error(value),
        },
        Err(e) => {
            warn!(%function, %id, error = %e, "rejecting undecodable request");
            ResponseResult::Error(Value::String(e.to_string()))
        }
    };

    Some(HostMessage::Adapter { id, result })
}
