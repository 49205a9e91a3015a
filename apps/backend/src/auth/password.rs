//! Password hashing and verification using Argon2id.
//!
//! Hashes are PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`), so
//! the salt and work factor travel with the hash and verification needs no
//! separate storage.

use std::collections::HashMap;
use std::sync::Mutex;

use actix_web::web;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Argon2, Params, Version};
use once_cell::sync::Lazy;

use crate::error::AppError;

const DECOY_PASSWORD: &str = "storefront-decoy-password";

/// One decoy hash per work factor, built on first use.
static DECOY_HASHES: Lazy<Mutex<HashMap<PasswordParams, String>>> = Lazy::new(Default::default);

/// Argon2 work factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PasswordParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism (lanes)
    pub parallelism: u32,
}

impl PasswordParams {
    /// Cheapest parameters Argon2 accepts. Only for tests.
    pub const fn for_tests() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST,
            iterations: 1,
            parallelism: 1,
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.argon2().map(|_| ())
    }

    fn argon2(&self) -> Result<Argon2<'static>, AppError> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| AppError::config(format!("invalid password hash parameters: {e}")))?;
        Ok(Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for PasswordParams {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str, params: &PasswordParams) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    params
        .argon2()?
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("failed to hash password: {e}")))
}

/// Verify a password against a stored PHC hash.
///
/// `Ok(false)` means the password does not match; `Err` means the stored
/// hash could not be parsed or the computation failed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::internal(format!("invalid password hash format: {e}")))?;

    // Parameters are taken from the parsed hash, not from `Argon2::default()`.
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::internal(format!(
            "password verification failed: {e}"
        ))),
    }
}

/// [`hash_password`] on the blocking thread pool.
pub async fn hash_password_blocking(
    password: String,
    params: PasswordParams,
) -> Result<String, AppError> {
    web::block(move || hash_password(&password, &params))
        .await
        .map_err(|e| AppError::internal(format!("password hashing task failed: {e}")))?
}

/// A valid PHC hash of a fixed password under `params`.
///
/// Verifying against it costs as much as verifying a stored hash, so a
/// login for an unknown account takes as long as a wrong password.
pub fn decoy_hash(params: &PasswordParams) -> Result<String, AppError> {
    let mut decoys = DECOY_HASHES
        .lock()
        .map_err(|_| AppError::internal("decoy hash cache poisoned"))?;
    if let Some(hash) = decoys.get(params) {
        return Ok(hash.clone());
    }
    let hash = hash_password(DECOY_PASSWORD, params)?;
    decoys.insert(*params, hash.clone());
    Ok(hash)
}

/// Run a full verification against [`decoy_hash`] on the blocking pool.
/// The outcome is discarded; only the cost matters.
pub async fn verify_decoy_blocking(
    password: String,
    params: PasswordParams,
) -> Result<(), AppError> {
    web::block(move || decoy_hash(&params).and_then(|hash| verify_password(&password, &hash)))
        .await
        .map_err(|e| AppError::internal(format!("password verification task failed: {e}")))?
        .map(|_| ())
}

/// [`verify_password`] on the blocking thread pool.
pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool, AppError> {
    web::block(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::internal(format!("password verification task failed: {e}")))?
}
