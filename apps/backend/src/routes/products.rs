use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::db::require_db;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::validated_json::ValidatedJson;
use crate::middleware::token_auth::TokenAuth;
use crate::repos::products::Product;
use crate::services::products::{self as product_service, ProductDraft};
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image: String,
    pub category: String,
    pub quantity: String,
    pub in_stock: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            title: p.title,
            description: p.description,
            image: p.image,
            category: p.category,
            quantity: p.quantity,
            in_stock: p.in_stock,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Body for both create and update; create requires every field but
/// `inStock`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<String>,
    pub in_stock: Option<bool>,
}

impl From<ProductRequest> for ProductDraft {
    fn from(body: ProductRequest) -> Self {
        Self {
            title: body.title,
            description: body.description,
            image: body.image,
            category: body.category,
            quantity: body.quantity,
            in_stock: body.in_stock,
        }
    }
}

fn parse_product_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>().map_err(|_| {
        AppError::bad_request(ErrorCode::InvalidId, format!("Invalid product id: {raw}"))
    })
}

async fn list_products(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let products: Vec<ProductResponse> = product_service::list_products(db)
        .await?
        .into_iter()
        .map(ProductResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(products))
}

async fn create_product(
    app_state: web::Data<AppState>,
    body: ValidatedJson<ProductRequest>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let product = product_service::create_product(db, body.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(ProductResponse::from(product)))
}

async fn get_product(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let product_id = parse_product_id(&path)?;
    let db = require_db(&app_state)?;
    let product = product_service::get_product(db, product_id).await?;
    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

async fn update_product(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
    body: ValidatedJson<ProductRequest>,
) -> Result<HttpResponse, AppError> {
    let product_id = parse_product_id(&path)?;
    let db = require_db(&app_state)?;
    let product =
        product_service::update_product(db, product_id, body.into_inner().into()).await?;
    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

async fn delete_product(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let product_id = parse_product_id(&path)?;
    let db = require_db(&app_state)?;
    product_service::delete_product(db, product_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Routes under `/products`. `/all` is registered before `/{productId}`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/all").route(web::get().to(list_products)))
        .service(
            web::resource("/create")
                .wrap(TokenAuth::admin())
                .route(web::post().to(create_product)),
        )
        .service(
            web::resource("/update/{productId}")
                .wrap(TokenAuth::admin())
                .route(web::put().to(update_product)),
        )
        .service(
            web::resource("/delete/{productId}")
                .wrap(TokenAuth::admin())
                .route(web::delete().to(delete_product)),
        )
        .service(
            web::resource("/{productId}")
                .wrap(TokenAuth::authenticated())
                .route(web::get().to(get_product)),
        );
}
