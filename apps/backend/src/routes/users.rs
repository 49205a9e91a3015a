use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::products::ProductResponse;
use crate::db::require_db;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::validated_json::ValidatedJson;
use crate::middleware::token_auth::TokenAuth;
use crate::repos::users::User;
use crate::services::users::{
    self as user_service, Registration, UserChanges, UserProfile, UserSummary,
};
use crate::state::app_state::AppState;

/// A user as returned to clients; the password hash is never included.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse<P> {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub is_admin: bool,
    pub saved_products: Vec<P>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl<P> UserResponse<P> {
    fn new(user: User, saved_products: Vec<P>) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            is_admin: user.is_admin,
            saved_products,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<UserSummary> for UserResponse<i64> {
    fn from(summary: UserSummary) -> Self {
        Self::new(summary.user, summary.saved_products)
    }
}

impl From<UserProfile> for UserResponse<ProductResponse> {
    fn from(profile: UserProfile) -> Self {
        let saved = profile
            .saved_products
            .into_iter()
            .map(ProductResponse::from)
            .collect();
        Self::new(profile.user, saved)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub saved_products: Vec<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
    pub saved_products: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserResponse<i64>,
    pub token: String,
}

fn parse_user_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::bad_request(ErrorCode::InvalidId, format!("Invalid user id: {raw}")))
}

async fn create_user(
    app_state: web::Data<AppState>,
    body: ValidatedJson<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let body = body.into_inner();
    let registration = Registration {
        email: body.email,
        username: body.username,
        password: body.password,
        is_admin: body.is_admin,
        saved_products: body.saved_products,
    };

    let created = user_service::register(db, &app_state.security, registration).await?;
    Ok(HttpResponse::Created().json(UserResponse::<i64>::from(created)))
}

async fn login(
    app_state: web::Data<AppState>,
    body: ValidatedJson<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let outcome =
        user_service::login(db, &app_state.security, &body.email, &body.password).await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        user: outcome.user.into(),
        token: outcome.token,
    }))
}

async fn list_users(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let users: Vec<UserResponse<i64>> = user_service::list_users(db)
        .await?
        .into_iter()
        .map(UserResponse::<i64>::from)
        .collect();
    Ok(HttpResponse::Ok().json(users))
}

async fn get_user(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user_id = parse_user_id(&path)?;
    let db = require_db(&app_state)?;
    let profile = user_service::get_profile(db, user_id).await?;
    Ok(HttpResponse::Ok().json(UserResponse::<ProductResponse>::from(profile)))
}

async fn update_user(
    app_state: web::Data<AppState>,
    current_user: CurrentUser,
    path: web::Path<String>,
    body: ValidatedJson<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = parse_user_id(&path)?;
    let db = require_db(&app_state)?;
    let body = body.into_inner();
    let changes = UserChanges {
        email: body.email,
        username: body.username,
        password: body.password,
        is_admin: body.is_admin,
        saved_products: body.saved_products,
    };

    let updated =
        user_service::update_user(db, &app_state.security, &current_user, user_id, changes)
            .await?;
    Ok(HttpResponse::Ok().json(UserResponse::<i64>::from(updated)))
}

async fn delete_user(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user_id = parse_user_id(&path)?;
    let db = require_db(&app_state)?;
    user_service::delete_user(db, user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Routes under `/users`. Literal segments are registered before `/{id}`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/create").route(web::post().to(create_user)))
        .service(web::resource("/login").route(web::post().to(login)))
        .service(
            web::resource("/all")
                .wrap(TokenAuth::admin())
                .route(web::get().to(list_users)),
        )
        .service(
            web::resource("/update/{id}")
                .wrap(TokenAuth::owner_or_admin())
                .route(web::put().to(update_user)),
        )
        .service(
            web::resource("/delete/{id}")
                .wrap(TokenAuth::owner_or_admin())
                .route(web::delete().to(delete_user)),
        )
        .service(
            web::resource("/{id}")
                .wrap(TokenAuth::owner_or_admin())
                .route(web::get().to(get_user)),
        );
}
