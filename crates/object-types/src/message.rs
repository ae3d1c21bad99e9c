use serde::{Deserialize, Serialize};

use crate::JsonValue;

/// Discriminant carried by every [`DataMessage`]; only `"data"` is valid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataKind {
    #[default]
    #[serde(rename = "data")]
    Data,
}

/// An application payload relayed from the chat to an object instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataMessage {
    #[serde(rename = "type", default)]
    pub kind: DataKind,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub from_address: String,
    pub object_id: String,
    pub instance_id: String,
    pub data: JsonValue,
}

impl DataMessage {
    pub fn new(
        timestamp: u64,
        from_address: impl Into<String>,
        object_id: impl Into<String>,
        instance_id: impl Into<String>,
        data: JsonValue,
    ) -> Self {
        DataMessage {
            kind: DataKind::Data,
            timestamp,
            from_address: from_address.into(),
            object_id: object_id.into(),
            instance_id: instance_id.into(),
            data,
        }
    }
}
