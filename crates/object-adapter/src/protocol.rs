//! Wire messages exchanged over the `postMessage` channel.

use object_types::{ContextProps, DataMessage, ObjectState};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Discriminant shared by requests and responses.
pub const ADAPTER: &str = "adapter";
pub const IFRAME_DATA_MESSAGE: &str = "iframe-data-message";
pub const IFRAME_CONTEXT_CHANGE: &str = "iframe-context-change";

/// Function names carried in the `function` field of a request.
pub mod functions {
    pub const GET_TRANSACTION: &str = "getTransaction";
    pub const GET_TRANSACTION_STATE: &str = "getTransactionState";
    pub const WAIT_FOR_TRANSACTION: &str = "waitForTransaction";
    pub const CHECK_BALANCE: &str = "checkBalance";
    pub const SEND_TRANSACTION: &str = "sendTransaction";
    pub const ESTIMATE_TRANSACTION: &str = "estimateTransaction";
    pub const GET_CONTRACT: &str = "getContract";
    pub const RPC_REQUEST: &str = "rpcRequest";
    pub const SEND: &str = "send";
    pub const UPDATE_STORE: &str = "updateStore";
    pub const ON_VIEW_CHANGE: &str = "onViewChange";
}

/// Object → host messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ObjectMessage {
    /// A capability call awaiting a response with the same `id`.
    Adapter {
        function: String,
        id: String,
        args: Vec<String>,
    },
    /// Object-side initialization is done; the host replies with context.
    Init,
    #[serde(rename_all = "camelCase")]
    WindowSize { scroll_width: u32, scroll_height: u32 },
}

/// Host → object messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HostMessage {
    Adapter { id: String, result: ResponseResult },
    IframeDataMessage {
        message: DataMessage,
        state: ObjectState,
        context: ContextProps,
    },
    IframeContextChange {
        state: ObjectState,
        context: ContextProps,
    },
}

/// Tagged outcome of a call: `{type: "success" | "error", value}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ResponseResult {
    Success(Value),
    Error(Value),
}

/// A `result` field as found on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum WireResult {
    Tagged(ResponseResult),
    /// A bare value from a host predating the tagged form.
    Legacy(Value),
}

impl ResponseResult {
    /// Reads a response's `result` field.
    ///
    /// An object whose `type` is `success` or `error` and whose only other
    /// key is `value` is the tagged form; anything else is legacy. A missing
    /// `value` is treated as `null`.
    pub fn from_wire(raw: Option<&Value>) -> WireResult {
        if let Some(Value::Object(map)) = raw {
            let tag = map.get("type").and_then(Value::as_str);
            let only_tag_and_value = map.keys().all(|k| k == "type" || k == "value");
            if only_tag_and_value {
                let value = map.get("value").cloned().unwrap_or(Value::Null);
                match tag {
                    Some("success") => return WireResult::Tagged(ResponseResult::Success(value)),
                    Some("error") => return WireResult::Tagged(ResponseResult::Error(value)),
                    _ => {}
                }
            }
        }
        WireResult::Legacy(raw.cloned().unwrap_or(Value::Null))
    }
}

/// The `type` discriminant of an inbound message, if it has one.
pub fn message_type(data: &Value) -> Option<&str> {
    data.get("type").and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_wire_shape() {
        let msg = ObjectMessage::Adapter {
            function: "getTransaction".into(),
            id: "abc".into(),
            args: vec!["0x01".into()],
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"type": "adapter", "function": "getTransaction", "id": "abc", "args": ["0x01"]})
        );
    }

    #[test]
    fn init_wire_shape() {
        assert_eq!(serde_json::to_value(ObjectMessage::Init).unwrap(), json!({"type": "init"}));
    }

    #[test]
    fn window_size_wire_shape() {
        let msg = ObjectMessage::WindowSize {
            scroll_width: 320,
            scroll_height: 480,
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"type": "window-size", "scrollWidth": 320, "scrollHeight": 480})
        );
    }

    #[test]
    fn tagged_response_wire_shape() {
        let msg = HostMessage::Adapter {
            id: "abc".into(),
            result: ResponseResult::Error(json!("nope")),
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"type": "adapter", "id": "abc", "result": {"type": "error", "value": "nope"}})
        );
    }

    #[test]
    fn context_change_type_name() {
        let value = json!({
            "type": "iframe-context-change",
            "state": {
                "chatId": "c", "objectId": "o", "instanceId": "i",
                "profile": {"address": "0x000000000000000000000000000000000000dead"},
                "users": [], "tokens": []
            },
            "context": {"view": "main"}
        });
        let msg: HostMessage = serde_json::from_value(value).unwrap();
        assert!(matches!(msg, HostMessage::IframeContextChange { .. }));
    }

    #[test]
    fn from_wire_reads_tagged_success() {
        let raw = json!({"type": "success", "value": {"hash": "0x1"}});
        assert_eq!(
            ResponseResult::from_wire(Some(&raw)),
            WireResult::Tagged(ResponseResult::Success(json!({"hash": "0x1"})))
        );
    }

    #[test]
    fn from_wire_treats_missing_value_as_null() {
        let raw = json!({"type": "success"});
        assert_eq!(
            ResponseResult::from_wire(Some(&raw)),
            WireResult::Tagged(ResponseResult::Success(Value::Null))
        );
    }

    #[test]
    fn from_wire_reads_tagged_error() {
        let raw = json!({"type": "error", "value": "denied"});
        assert_eq!(
            ResponseResult::from_wire(Some(&raw)),
            WireResult::Tagged(ResponseResult::Error(json!("denied")))
        );
    }

    #[test]
    fn from_wire_bare_values_are_legacy() {
        assert_eq!(
            ResponseResult::from_wire(Some(&json!("0xhash"))),
            WireResult::Legacy(json!("0xhash"))
        );
        assert_eq!(ResponseResult::from_wire(None), WireResult::Legacy(Value::Null));
    }

    #[test]
    fn from_wire_objects_with_extra_keys_are_legacy() {
        let raw = json!({"type": "success", "value": 1, "hash": "0x1"});
        assert_eq!(ResponseResult::from_wire(Some(&raw)), WireResult::Legacy(raw.clone()));
    }

    #[test]
    fn message_type_reads_discriminant() {
        assert_eq!(message_type(&json!({"type": "adapter"})), Some("adapter"));
        assert_eq!(message_type(&json!({"type": 3})), None);
        assert_eq!(message_type(&json!("adapter")), None);
    }
}
