use serde::{Deserialize, Serialize};

use crate::token::Token;
use crate::user::User;
use crate::JsonValue;

/// Read-only snapshot of the chat an object instance lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectState {
    pub chat_id: String,
    pub object_id: String,
    pub instance_id: String,
    /// The local user.
    pub profile: User,
    pub users: Vec<User>,
    pub tokens: Vec<Token>,
}

impl ObjectState {
    /// Looks up a participant by address, ignoring case and prefix.
    pub fn find_user(&self, address: &crate::Address) -> Option<&User> {
        self.users.iter().find(|u| u.address.same_account(address))
    }

    /// Looks up a held token by symbol.
    pub fn find_token(&self, symbol: &str) -> Option<&Token> {
        self.tokens.iter().find(|t| t.symbol == symbol)
    }
}

/// Per-instance context the host keeps for an object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
}
