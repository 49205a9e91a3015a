use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;

use crate::auth::password::PasswordParams;
use crate::error::AppError;

/// Lifetime applied to access tokens unless configured otherwise: one day.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Where the access token lifetime comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TokenTtlSource {
    /// Always [`DEFAULT_TOKEN_TTL`]; `JWT_EXPIRY_PERIOD` is ignored.
    #[default]
    Fixed,
    /// Use the configured expiry period.
    ExpiryPeriod,
}

impl FromStr for TokenTtlSource {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "expiry-period" | "expiry_period" => Ok(Self::ExpiryPeriod),
            other => Err(AppError::config(format!(
                "invalid token TTL source '{other}' (expected 'fixed' or 'expiry-period')"
            ))),
        }
    }
}

/// Configuration for JWT and credential security settings
#[derive(Clone)]
pub struct SecurityConfig {
    /// Secret key for signing and verifying tokens
    pub jwt_secret: Vec<u8>,
    /// JWT algorithm to use (defaults to HS256)
    pub algorithm: Algorithm,
    pub ttl_source: TokenTtlSource,
    /// Value of `JWT_EXPIRY_PERIOD`, if any
    pub expiry_period: Option<Duration>,
    /// Argon2 work factor for new password hashes
    pub password: PasswordParams,
}

impl SecurityConfig {
    /// Create a new SecurityConfig with the given JWT secret
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            ttl_source: TokenTtlSource::default(),
            expiry_period: None,
            password: PasswordParams::default(),
        }
    }

    /// Config with a fixed secret and the cheapest password hashing.
    pub fn for_tests() -> Self {
        Self::new("test_secret_key_for_testing_purposes_only")
            .with_password_params(PasswordParams::for_tests())
    }

    pub fn with_ttl_source(mut self, source: TokenTtlSource) -> Self {
        self.ttl_source = source;
        self
    }

    pub fn with_expiry_period(mut self, period: Duration) -> Self {
        self.expiry_period = Some(period);
        self
    }

    pub fn with_password_params(mut self, params: PasswordParams) -> Self {
        self.password = params;
        self
    }

    /// Lifetime of newly minted access tokens.
    pub fn token_ttl(&self) -> Duration {
        match self.ttl_source {
            TokenTtlSource::Fixed => DEFAULT_TOKEN_TTL,
            TokenTtlSource::ExpiryPeriod => self.expiry_period.unwrap_or(DEFAULT_TOKEN_TTL),
        }
    }

    /// Fails when no usable signing secret is present.
    pub fn require_secret(&self) -> Result<&[u8], AppError> {
        if self.jwt_secret.is_empty() {
            return Err(AppError::config("JWT signing secret is not configured"));
        }
        Ok(&self.jwt_secret)
    }
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .field("ttl_source", &self.ttl_source)
            .field("expiry_period", &self.expiry_period)
            .field("password", &self.password)
            .finish()
    }
}
