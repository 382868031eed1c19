//! Identity carried inside access tokens.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Registered claim names owned by the token codec.
pub const RESERVED_CLAIMS: [&str; 2] = ["iat", "exp"];

/// Identity payload embedded in an access token and attached to the
/// request by the credential gate.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IdentityClaim {
    pub email: String,
    /// Additional issuer-chosen fields, flattened into the token payload
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl IdentityClaim {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Drop caller-supplied fields that collide with registered claims.
    pub fn without_reserved(mut self) -> Self {
        self.extra
            .retain(|key, _| !RESERVED_CLAIMS.contains(&key.as_str()));
        self
    }
}

/// Full token payload: identity plus issuance and expiry (seconds since epoch).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    #[serde(flatten)]
    pub identity: IdentityClaim,
    pub iat: i64,
    pub exp: i64,
}
