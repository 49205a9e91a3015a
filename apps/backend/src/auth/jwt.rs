use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::claims::Identity;
use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// Claims included in backend-issued access tokens.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    #[serde(flatten)]
    pub identity: Identity,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

/// Mint an access token for `identity`, valid for the configured TTL from `now`.
pub fn mint_access_token(
    identity: &Identity,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let secret = security.require_secret()?;

    let iat = now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::internal("Failed to get current time".to_string()))?
        .as_secs() as i64;
    let exp = iat + security.token_ttl().as_secs() as i64;

    let claims = Claims {
        identity: identity.clone(),
        iat,
        exp,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Verify a token and return its claims.
///
/// Bad signatures, malformed tokens and expired tokens all yield
/// `AppError::InvalidToken`; the underlying reason is only logged.
pub fn verify_access_token(token: &str, security: &SecurityConfig) -> Result<Claims, AppError> {
    let secret = security.require_secret()?;

    let mut validation = Validation::new(security.algorithm);
    validation.leeway = 0;

    decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            debug!(reason = ?e.kind(), "access token rejected");
            AppError::invalid_token()
        })
}
