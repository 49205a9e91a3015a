//! Product catalog CRUD.

use sea_orm::DatabaseConnection;
use tracing::{debug, info};

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos::products::{self, NewProduct, Product, ProductUpdate};

fn require_field(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::invalid(
            ErrorCode::ValidationError,
            format!("{field} is required"),
        )),
    }
}

fn reject_blank(value: &Option<String>, field: &str) -> Result<(), AppError> {
    match value {
        Some(v) if v.trim().is_empty() => Err(AppError::invalid(
            ErrorCode::ValidationError,
            format!("{field} must not be empty"),
        )),
        _ => Ok(()),
    }
}

/// Fields of a product as submitted by a client; required ones are
/// checked by [`create_product`].
#[derive(Debug, Clone, Default)]
pub struct ProductDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<String>,
    pub in_stock: Option<bool>,
}

pub async fn create_product(
    db: &DatabaseConnection,
    draft: ProductDraft,
) -> Result<Product, AppError> {
    let new_product = NewProduct {
        title: require_field(draft.title, "title")?,
        description: require_field(draft.description, "description")?,
        image: require_field(draft.image, "image")?,
        category: require_field(draft.category, "category")?,
        quantity: require_field(draft.quantity, "quantity")?,
        in_stock: draft.in_stock.unwrap_or(false),
    };

    let product = products::create_product(db, new_product).await?;
    info!(product_id = product.id, "product created");
    Ok(product)
}

pub async fn list_products(db: &DatabaseConnection) -> Result<Vec<Product>, AppError> {
    Ok(products::list_products(db).await?)
}

pub async fn get_product(db: &DatabaseConnection, product_id: i64) -> Result<Product, AppError> {
    products::find_product_by_id(db, product_id)
        .await?
        .ok_or_else(|| product_not_found(product_id))
}

pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    draft: ProductDraft,
) -> Result<Product, AppError> {
    reject_blank(&draft.title, "title")?;
    reject_blank(&draft.description, "description")?;
    reject_blank(&draft.image, "image")?;
    reject_blank(&draft.category, "category")?;
    reject_blank(&draft.quantity, "quantity")?;

    let update = ProductUpdate {
        title: draft.title,
        description: draft.description,
        image: draft.image,
        category: draft.category,
        quantity: draft.quantity,
        in_stock: draft.in_stock,
    };

    let product = products::update_product(db, product_id, update)
        .await?
        .ok_or_else(|| product_not_found(product_id))?;
    info!(product_id, "product updated");
    Ok(product)
}

/// Delete a product. Deleting an unknown id is not an error.
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<(), AppError> {
    if products::delete_product(db, product_id).await? {
        info!(product_id, "product deleted");
    } else {
        debug!(product_id, "delete for unknown product");
    }
    Ok(())
}

fn product_not_found(product_id: i64) -> AppError {
    AppError::not_found(
        ErrorCode::ProductNotFound,
        format!("Product {product_id} not found"),
    )
}
