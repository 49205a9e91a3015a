//! User accounts: registration, login, profile reads and updates.

use std::time::SystemTime;

use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{debug, info, warn};
use unicode_normalization::UnicodeNormalization;

use crate::auth::claims::Identity;
use crate::auth::jwt::mint_access_token;
use crate::auth::password::{
    hash_password_blocking, verify_decoy_blocking, verify_password_blocking,
};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::current_user::CurrentUser;
use crate::logging::pii::Redacted;
use crate::repos::products::{existing_product_ids, Product};
use crate::repos::users::{self, NewUser, User, UserUpdate};
use crate::state::security_config::SecurityConfig;

#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub password: String,
    pub is_admin: bool,
    pub saved_products: Vec<i64>,
}

/// Requested changes; `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
    pub saved_products: Option<Vec<i64>>,
}

/// A user with the ids of their saved products.
#[derive(Debug, Clone, PartialEq)]
pub struct UserSummary {
    pub user: User,
    pub saved_products: Vec<i64>,
}

/// A user with their saved products expanded.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub user: User,
    pub saved_products: Vec<Product>,
}

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: UserSummary,
    pub token: String,
}

/// Canonical form of an email address: trimmed, NFKC-normalized and
/// lowercased. Rejects values that are not shaped like `local@domain`.
pub fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email: String = raw.trim().nfkc().collect::<String>().to_lowercase();

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(email)
    } else {
        Err(AppError::invalid(
            ErrorCode::InvalidEmail,
            "A valid email address is required",
        ))
    }
}

fn require_non_blank(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::invalid(
            ErrorCode::ValidationError,
            format!("{field} is required"),
        ));
    }
    Ok(())
}

/// Fails unless every id in `ids` names an existing product.
async fn ensure_products_exist<C>(conn: &C, ids: &[i64]) -> Result<(), AppError>
where
    C: sea_orm::ConnectionTrait + Send + Sync,
{
    let found = existing_product_ids(conn, ids).await?;
    let missing: Vec<String> = ids
        .iter()
        .filter(|id| !found.contains(id))
        .map(i64::to_string)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::invalid(
            ErrorCode::ValidationError,
            format!("Unknown product ids: {}", missing.join(", ")),
        ))
    }
}

fn identity_of(user: &User) -> Identity {
    Identity {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        is_admin: user.is_admin,
    }
}

pub async fn register(
    db: &DatabaseConnection,
    security: &SecurityConfig,
    registration: Registration,
) -> Result<UserSummary, AppError> {
    require_non_blank(&registration.username, "username")?;
    require_non_blank(&registration.password, "password")?;
    let email = normalize_email(&registration.email)?;

    let password_hash = hash_password_blocking(registration.password, security.password).await?;

    let txn = db.begin().await?;
    ensure_products_exist(&txn, &registration.saved_products).await?;
    let user = users::create_user(
        &txn,
        NewUser {
            email,
            username: registration.username.trim().to_string(),
            password_hash,
            is_admin: registration.is_admin,
        },
    )
    .await?;
    users::replace_saved_products(&txn, user.id, &registration.saved_products).await?;
    let saved_products = users::saved_product_ids(&txn, &[user.id])
        .await?
        .remove(&user.id)
        .unwrap_or_default();
    txn.commit().await?;

    info!(user_id = user.id, email = %Redacted(&user.email), is_admin = user.is_admin, "user registered");
    Ok(UserSummary {
        user,
        saved_products,
    })
}

/// Check credentials and mint an access token.
///
/// Unknown emails and wrong passwords fail identically.
pub async fn login(
    db: &DatabaseConnection,
    security: &SecurityConfig,
    email: &str,
    password: &str,
) -> Result<LoginOutcome, AppError> {
    let Ok(email) = normalize_email(email) else {
        return Err(AppError::invalid_credentials());
    };

    let Some(user) = users::find_user_by_email(db, &email).await? else {
        debug!(email = %Redacted(&email), "login for unknown email");
        // Same Argon2 cost as a wrong password.
        if let Err(e) = verify_decoy_blocking(password.to_string(), security.password).await {
            warn!(error = %e, "decoy password verification failed");
        }
        return Err(AppError::invalid_credentials());
    };

    let matches = match verify_password_blocking(password.to_string(), user.password_hash.clone())
        .await
    {
        Ok(matches) => matches,
        Err(e) => {
            warn!(user_id = user.id, error = %e, "stored password hash could not be verified");
            false
        }
    };
    if !matches {
        debug!(user_id = user.id, "login with wrong password");
        return Err(AppError::invalid_credentials());
    }

    let token = mint_access_token(&identity_of(&user), SystemTime::now(), security)?;
    let saved_products = users::saved_product_ids(db, &[user.id])
        .await?
        .remove(&user.id)
        .unwrap_or_default();

    info!(user_id = user.id, "user logged in");
    Ok(LoginOutcome {
        user: UserSummary {
            user,
            saved_products,
        },
        token,
    })
}

pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<UserSummary>, AppError> {
    let all = users::list_users(db).await?;
    let ids: Vec<i64> = all.iter().map(|u| u.id).collect();
    let mut saved = users::saved_product_ids(db, &ids).await?;

    Ok(all
        .into_iter()
        .map(|user| {
            let saved_products = saved.remove(&user.id).unwrap_or_default();
            UserSummary {
                user,
                saved_products,
            }
        })
        .collect())
}

pub async fn get_profile(db: &DatabaseConnection, user_id: i64) -> Result<UserProfile, AppError> {
    let user = users::find_user_by_id(db, user_id)
        .await?
        .ok_or_else(|| user_not_found(user_id))?;
    let saved_products = users::saved_products_of(db, user_id).await?;
    Ok(UserProfile {
        user,
        saved_products,
    })
}

/// Apply `changes` to a user on behalf of `actor`.
///
/// A new password is hashed before it is stored. Changing the admin flag
/// requires an admin actor.
pub async fn update_user(
    db: &DatabaseConnection,
    security: &SecurityConfig,
    actor: &CurrentUser,
    user_id: i64,
    changes: UserChanges,
) -> Result<UserSummary, AppError> {
    let email = changes.email.as_deref().map(normalize_email).transpose()?;
    if let Some(username) = &changes.username {
        require_non_blank(username, "username")?;
    }
    let password_hash = match changes.password {
        Some(password) => {
            require_non_blank(&password, "password")?;
            Some(hash_password_blocking(password, security.password).await?)
        }
        None => None,
    };

    let txn = db.begin().await?;
    let current = users::find_user_by_id(&txn, user_id)
        .await?
        .ok_or_else(|| user_not_found(user_id))?;

    let is_admin = match changes.is_admin {
        Some(requested) if requested != current.is_admin => {
            if !actor.is_admin {
                warn!(actor_id = actor.id, user_id, "non-admin attempted to change admin flag");
                return Err(AppError::forbidden());
            }
            Some(requested)
        }
        _ => None,
    };

    let update = UserUpdate {
        email,
        username: changes.username.map(|u| u.trim().to_string()),
        password_hash,
        is_admin,
    };
    let user = if update.is_empty() {
        current
    } else {
        users::update_user(&txn, user_id, update)
            .await?
            .ok_or_else(|| user_not_found(user_id))?
    };

    if let Some(ids) = &changes.saved_products {
        ensure_products_exist(&txn, ids).await?;
        users::replace_saved_products(&txn, user_id, ids).await?;
    }
    let saved_products = users::saved_product_ids(&txn, &[user_id])
        .await?
        .remove(&user_id)
        .unwrap_or_default();
    txn.commit().await?;

    info!(actor_id = actor.id, user_id, "user updated");
    Ok(UserSummary {
        user,
        saved_products,
    })
}

/// Delete a user. Deleting an unknown id is not an error.
pub async fn delete_user(db: &DatabaseConnection, user_id: i64) -> Result<(), AppError> {
    let txn = db.begin().await?;
    let removed = users::delete_user(&txn, user_id).await?;
    txn.commit().await?;

    if removed {
        info!(user_id, "user deleted");
    } else {
        debug!(user_id, "delete for unknown user");
    }
    Ok(())
}

fn user_not_found(user_id: i64) -> AppError {
    AppError::not_found(ErrorCode::UserNotFound, format!("User {user_id} not found"))
}
