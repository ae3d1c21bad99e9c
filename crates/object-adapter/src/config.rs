use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

/// Where outbound messages may be delivered, and which inbound origin is
/// trusted.
///
/// `Any` is the `"*"` wildcard. It works everywhere but lets any embedding
/// page read the traffic; production objects should pin the host origin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TargetOrigin {
    #[default]
    Any,
    Exact(String),
}

impl TargetOrigin {
    /// Value passed as `targetOrigin` to `postMessage`.
    pub fn as_str(&self) -> &str {
        match self {
            TargetOrigin::Any => "*",
            TargetOrigin::Exact(origin) => origin,
        }
    }

    /// Whether a message from `origin` should be dispatched.
    pub fn accepts(&self, origin: &str) -> bool {
        match self {
            TargetOrigin::Any => true,
            TargetOrigin::Exact(expected) => expected == origin,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, TargetOrigin::Any)
    }
}

impl TryFrom<String> for TargetOrigin {
    type Error = BridgeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let trimmed = value.trim().trim_end_matches('/');
        match trimmed {
            "*" => Ok(TargetOrigin::Any),
            "" => Err(BridgeError::Config("target origin must not be empty".into())),
            origin => Ok(TargetOrigin::Exact(origin.to_string())),
        }
    }
}

impl From<TargetOrigin> for String {
    fn from(origin: TargetOrigin) -> Self {
        origin.as_str().to_string()
    }
}

impl fmt::Display for TargetOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bridge settings. Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BridgeConfig {
    pub target_origin: TargetOrigin,
    /// Reject calls that get no response within this many milliseconds.
    /// Unset means calls wait forever.
    pub call_timeout_ms: Option<u64>,
    /// Accept untagged `result` values from older hosts as successes.
    pub legacy_results: bool,
}

impl BridgeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, BridgeError> {
        serde_json::from_str(json).map_err(|e| BridgeError::Config(e.to_string()))
    }

    pub fn with_target_origin(mut self, origin: TargetOrigin) -> Self {
        self.target_origin = origin;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout_ms = Some(timeout.as_millis().try_into().unwrap_or(u64::MAX));
        self
    }

    pub fn with_legacy_results(mut self, enabled: bool) -> Self {
        self.legacy_results = enabled;
        self
    }

    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_ms.map(Duration::from_millis)
    }
}
