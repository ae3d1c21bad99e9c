use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;

/// Number of random bytes in a call id.
const ID_BYTES: usize = 16;

/// Correlation id of an outbound call.
///
/// 128 random bits, hex-encoded. Collisions are not checked for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallId(String);

impl CallId {
    pub fn generate() -> Self {
        let mut buf = [0u8; ID_BYTES];
        OsRng.fill_bytes(&mut buf);
        CallId(hex::encode(buf))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<CallId> for String {
    fn from(id: CallId) -> Self {
        id.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
