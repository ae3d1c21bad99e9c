use serde::{Deserialize, Serialize};

use crate::address::Address;

/// A chat participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    pub fn new(address: Address) -> Self {
        User {
            address,
            name: None,
            avatar: None,
        }
    }

    /// The name if set, otherwise the address.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.address.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_address_only_user() {
        let user: User = serde_json::from_value(json!({
            "address": "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"
        }))
        .unwrap();
        assert!(user.name.is_none());
        assert_eq!(user.display_name(), "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed");
    }

    #[test]
    fn display_name_prefers_name() {
        let mut user = User::new(Address::parse("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap());
        user.name = Some("alice".into());
        assert_eq!(user.display_name(), "alice");
    }

    #[test]
    fn rejects_invalid_address() {
        assert!(serde_json::from_value::<User>(json!({"address": "alice"})).is_err());
    }

    #[test]
    fn rejects_missing_address() {
        assert!(serde_json::from_value::<User>(json!({"name": "alice"})).is_err());
    }
}
