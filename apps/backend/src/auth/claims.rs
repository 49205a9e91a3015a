//! Identity carried inside access tokens and the per-request auth context.

use serde::{Deserialize, Serialize};

use super::jwt::Claims;

/// Who a token speaks for. Serialized as `{"id","username","email","isAdmin"}`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

/// Verified claims for the current request, inserted into request
/// extensions by the token middleware.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub claims: Claims,
}

impl AuthContext {
    pub fn identity(&self) -> &Identity {
        &self.claims.identity
    }
}
