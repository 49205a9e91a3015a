//! Seed data written through the service layer, plus tokens for it.

use std::time::SystemTime;

use backend_test_support::unique_helpers::{unique_email, unique_str};
use storefront_backend::db::require_db;
use storefront_backend::services::products::{self as product_service, ProductDraft};
use storefront_backend::services::users::{self as user_service, Registration};
use storefront_backend::{mint_access_token, AppError, AppState, Identity};

pub const TEST_PASSWORD: &str = "correct horse battery staple";

#[derive(Debug, Clone)]
pub struct SeededUser {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub is_admin: bool,
    pub token: String,
}

impl SeededUser {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            is_admin: self.is_admin,
        }
    }
}

pub async fn seed_user(state: &AppState, is_admin: bool) -> Result<SeededUser, AppError> {
    let db = require_db(state)?;
    let summary = user_service::register(
        db,
        &state.security,
        Registration {
            email: unique_email(if is_admin { "admin" } else { "shopper" }),
            username: unique_str("user"),
            password: TEST_PASSWORD.to_string(),
            is_admin,
            saved_products: Vec::new(),
        },
    )
    .await?;

    let mut seeded = SeededUser {
        id: summary.user.id,
        email: summary.user.email,
        username: summary.user.username,
        is_admin: summary.user.is_admin,
        token: String::new(),
    };
    seeded.token = mint_access_token(&seeded.identity(), SystemTime::now(), &state.security)?;
    Ok(seeded)
}

pub async fn seed_product(state: &AppState, title: &str) -> Result<i64, AppError> {
    let db = require_db(state)?;
    let product = product_service::create_product(
        db,
        ProductDraft {
            title: Some(title.to_string()),
            description: Some(format!("{title} description")),
            image: Some(format!("https://img.example.test/{title}.png")),
            category: Some("shoes".to_string()),
            quantity: Some("10".to_string()),
            in_stock: Some(true),
        },
    )
    .await?;
    Ok(product.id)
}

/// `token` header value in the `Bearer <jwt>` shape clients send.
pub fn bearer(token: &str) -> (&'static str, String) {
    ("token", format!("Bearer {token}"))
}
