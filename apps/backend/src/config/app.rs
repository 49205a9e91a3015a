//! Process configuration, read once from the environment at startup.

use std::env;

use tracing::warn;

use super::duration::parse_duration;
use crate::auth::password::PasswordParams;
use crate::error::AppError;
use crate::state::security_config::{SecurityConfig, TokenTtlSource};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8800;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Origins allowed by CORS; empty means the localhost fallback.
    pub cors_allowed_origins: Vec<String>,
    pub security: SecurityConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = get("BACKEND_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match get("BACKEND_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                AppError::config(format!("BACKEND_PORT must be a valid port number, got '{raw}'"))
            })?,
            None => DEFAULT_PORT,
        };

        let database_url = get("DATABASE_URL").ok_or_else(|| missing("DATABASE_URL"))?;

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_default();

        let security = security_from_lookup(&get)?;

        Ok(Self {
            host,
            port,
            database_url,
            cors_allowed_origins,
            security,
        })
    }
}

fn security_from_lookup(get: &impl Fn(&str) -> Option<String>) -> Result<SecurityConfig, AppError> {
    let secret = get("JWT_SEC").ok_or_else(|| missing("JWT_SEC"))?;

    let ttl_source = match get("JWT_TTL_SOURCE") {
        Some(raw) => raw.parse::<TokenTtlSource>()?,
        None => TokenTtlSource::default(),
    };

    let expiry_period = get("JWT_EXPIRY_PERIOD")
        .map(|raw| parse_duration(&raw))
        .transpose()?;

    match (ttl_source, expiry_period) {
        (TokenTtlSource::Fixed, Some(period)) => {
            warn!(
                expiry_period_secs = period.as_secs(),
                "JWT_EXPIRY_PERIOD is set but JWT_TTL_SOURCE=fixed; tokens keep the one-day lifetime"
            );
        }
        (TokenTtlSource::ExpiryPeriod, None) => {
            return Err(AppError::config(
                "JWT_TTL_SOURCE=expiry-period requires JWT_EXPIRY_PERIOD",
            ));
        }
        _ => {}
    }

    let password = password_params_from_lookup(get)?;

    let mut security = SecurityConfig::new(secret.into_bytes())
        .with_ttl_source(ttl_source)
        .with_password_params(password);
    if let Some(period) = expiry_period {
        security = security.with_expiry_period(period);
    }
    Ok(security)
}

fn password_params_from_lookup(
    get: &impl Fn(&str) -> Option<String>,
) -> Result<PasswordParams, AppError> {
    let defaults = PasswordParams::default();
    let params = PasswordParams {
        memory_kib: parse_u32(get, "PASSWORD_HASH_MEMORY_KIB")?.unwrap_or(defaults.memory_kib),
        iterations: parse_u32(get, "PASSWORD_HASH_ITERATIONS")?.unwrap_or(defaults.iterations),
        parallelism: parse_u32(get, "PASSWORD_HASH_PARALLELISM")?.unwrap_or(defaults.parallelism),
    };
    params.validate()?;
    Ok(params)
}

fn parse_u32(get: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<u32>, AppError> {
    get(name)
        .map(|raw| {
            raw.trim()
                .parse::<u32>()
                .map_err(|_| {
                    AppError::config(format!("{name} must be a positive integer, got '{raw}'"))
                })
        })
        .transpose()
}

/// Comma-separated origins; empty, `null` and non-http(s) entries are dropped.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(str::to_string)
        .collect()
}

fn missing(name: &str) -> AppError {
    AppError::config(format!("Required environment variable '{name}' is not set"))
}
