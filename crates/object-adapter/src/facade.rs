use std::convert::Infallible;

use object_types::{Address, Token, Transaction, TransactionState};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::bridge::Bridge;
use crate::error::BridgeError;
use crate::pending::{Acknowledgement, PendingCall};
use crate::protocol::functions;

/// Typed host capabilities available to an object.
///
/// Every response is validated before it is returned; a payload that does
/// not match its schema fails with [`BridgeError::InvalidResponse`].
#[derive(Clone)]
pub struct Adapter {
    bridge: Bridge,
}

impl Adapter {
    pub fn new(bridge: Bridge) -> Self {
        Adapter { bridge }
    }

    pub fn bridge(&self) -> &Bridge {
        &self.bridge
    }

    /// Looks up a transaction. `Ok(None)` when the host has no record of it.
    pub async fn get_transaction(&self, tx_hash: &str) -> Result<Option<Transaction>, BridgeError> {
        let value = self
            .bridge
            .call(functions::GET_TRANSACTION, vec![tx_hash.to_string()])
            .await?;
        if value.is_null() {
            return Ok(None);
        }
        decode(functions::GET_TRANSACTION, value).map(Some)
    }

    pub async fn get_transaction_state(&self, tx_hash: &str) -> Result<TransactionState, BridgeError> {
        let value = self
            .bridge
            .call(functions::GET_TRANSACTION_STATE, vec![tx_hash.to_string()])
            .await?;
        decode(functions::GET_TRANSACTION_STATE, value)
    }

    /// Like [`get_transaction_state`](Self::get_transaction_state), but the
    /// host answers only once the transaction is final.
    pub async fn wait_for_transaction(&self, tx_hash: &str) -> Result<TransactionState, BridgeError> {
        let value = self
            .bridge
            .call(functions::WAIT_FOR_TRANSACTION, vec![tx_hash.to_string()])
            .await?;
        decode(functions::WAIT_FOR_TRANSACTION, value)
    }

    /// Asks the host to refresh the balance of `token`. Fire-and-forget.
    pub fn check_balance(&self, token: &Token) -> Acknowledgement {
        Acknowledgement::new(self.call_with(functions::CHECK_BALANCE, Vec::new(), token))
    }

    /// Sends `token` to `to` and returns the transaction hash.
    pub async fn send_transaction(&self, to: &Address, token: &Token) -> Result<String, BridgeError> {
        let value = self
            .call_with(functions::SEND_TRANSACTION, vec![to.to_string()], token)
            .await?;
        match value {
            Value::String(hash) => Ok(hash),
            other => Err(BridgeError::invalid_response(
                functions::SEND_TRANSACTION,
                format!("expected a transaction hash string, got {other}"),
            )),
        }
    }

    /// Estimates the fee of sending `token` to `to`.
    ///
    /// Older hosts received estimates under the `sendTransaction` name; this
    /// always sends `estimateTransaction`, so such hosts must be updated to
    /// answer it.
    pub async fn estimate_transaction(&self, to: &Address, token: &Token) -> Result<Token, BridgeError> {
        let value = self
            .call_with(functions::ESTIMATE_TRANSACTION, vec![to.to_string()], token)
            .await?;
        decode(functions::ESTIMATE_TRANSACTION, value)
    }

    /// Contract handles are not offered by any host.
    pub fn get_contract(&self, _address: &Address, _abi: &Value) -> Result<Infallible, BridgeError> {
        Err(BridgeError::UnsupportedCapability(functions::GET_CONTRACT.to_string()))
    }

    /// Routes an arbitrary JSON-RPC request through the host's chain client.
    pub async fn rpc_request(&self, method: &str, params: &Value) -> Result<Value, BridgeError> {
        self.call_with(functions::RPC_REQUEST, vec![method.to_string()], params)
            .await
    }

    /// Posts `function` with `args` followed by `payload` as JSON.
    fn call_with<T: Serialize>(
        &self,
        function: &str,
        mut args: Vec<String>,
        payload: &T,
    ) -> PendingCall {
        match encode_arg(function, payload) {
            Ok(encoded) => {
                args.push(encoded);
                self.bridge.call(function, args)
            }
            Err(e) => PendingCall::failed(String::new(), function.to_string(), e),
        }
    }
}

pub(crate) fn encode_arg<T: Serialize + ?Sized>(function: &str, value: &T) -> Result<String, BridgeError> {
    serde_json::to_string(value).map_err(|e| BridgeError::Encode(format!("{function}: {e}")))
}

fn decode<T: DeserializeOwned>(function: &str, value: Value) -> Result<T, BridgeError> {
    serde_json::from_value(value).map_err(|e| BridgeError::invalid_response(function, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_reports_function_name() {
        let err = decode::<TransactionState>(functions::GET_TRANSACTION_STATE, json!("done")).unwrap_err();
        assert!(err.to_string().starts_with("invalid response to getTransactionState"));
    }

    #[test]
    fn encode_arg_produces_json_text() {
        let encoded = encode_arg(functions::RPC_REQUEST, &json!(["latest", false])).unwrap();
        assert_eq!(encoded, r#"["latest",false]"#);
    }
}
