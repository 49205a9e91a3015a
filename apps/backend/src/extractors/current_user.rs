use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use serde::Serialize;

use crate::auth::claims::AuthContext;
use crate::error::AppError;

/// The authenticated caller, as asserted by a verified token.
///
/// Populated from the [`AuthContext`] that `TokenAuth` stores in request
/// extensions. Handlers mounted without the middleware get a 401 rather
/// than a panic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    /// Token expiry, seconds since epoch
    pub expires_at: i64,
}

impl CurrentUser {
    /// Whether the caller may act on the user with `user_id`.
    pub fn can_act_on(&self, user_id: i64) -> bool {
        self.is_admin || self.id == user_id
    }
}

impl From<&AuthContext> for CurrentUser {
    fn from(ctx: &AuthContext) -> Self {
        let identity = ctx.identity();
        Self {
            id: identity.id,
            username: identity.username.clone(),
            email: identity.email.clone(),
            is_admin: identity.is_admin,
            expires_at: ctx.claims.exp,
        }
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthContext>()
                .map(CurrentUser::from)
                .ok_or_else(AppError::unauthenticated),
        )
    }
}
