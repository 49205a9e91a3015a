//! Product repository functions (generic over `ConnectionTrait`).

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, NotSet,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use time::OffsetDateTime;

use crate::entities::{products, saved_products};
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image: String,
    pub category: String,
    pub quantity: String,
    pub in_stock: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub image: String,
    pub category: String,
    pub quantity: String,
    pub in_stock: bool,
}

/// Partial update; `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<String>,
    pub in_stock: Option<bool>,
}

pub async fn create_product<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    new_product: NewProduct,
) -> Result<Product, DomainError> {
    let now = OffsetDateTime::now_utc();
    let active = products::ActiveModel {
        id: NotSet,
        title: Set(new_product.title),
        description: Set(new_product.description),
        image: Set(new_product.image),
        category: Set(new_product.category),
        quantity: Set(new_product.quantity),
        in_stock: Set(new_product.in_stock),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = active.insert(conn).await?;
    Ok(Product::from(model))
}

pub async fn find_product_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    product_id: i64,
) -> Result<Option<Product>, DomainError> {
    let model = products::Entity::find_by_id(product_id).one(conn).await?;
    Ok(model.map(Product::from))
}

pub async fn list_products<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<Product>, DomainError> {
    let models = products::Entity::find()
        .order_by_asc(products::Column::Id)
        .all(conn)
        .await?;
    Ok(models.into_iter().map(Product::from).collect())
}

/// Which of `ids` exist, ascending.
pub async fn existing_product_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: &[i64],
) -> Result<Vec<i64>, DomainError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let found: Vec<i64> = products::Entity::find()
        .select_only()
        .column(products::Column::Id)
        .filter(products::Column::Id.is_in(ids.to_vec()))
        .order_by_asc(products::Column::Id)
        .into_tuple()
        .all(conn)
        .await?;
    Ok(found)
}

/// Apply `update`; `Ok(None)` when the product does not exist.
pub async fn update_product<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    product_id: i64,
    update: ProductUpdate,
) -> Result<Option<Product>, DomainError> {
    let Some(model) = products::Entity::find_by_id(product_id).one(conn).await? else {
        return Ok(None);
    };

    let mut active = model.into_active_model();
    if let Some(title) = update.title {
        active.title = Set(title);
    }
    if let Some(description) = update.description {
        active.description = Set(description);
    }
    if let Some(image) = update.image {
        active.image = Set(image);
    }
    if let Some(category) = update.category {
        active.category = Set(category);
    }
    if let Some(quantity) = update.quantity {
        active.quantity = Set(quantity);
    }
    if let Some(in_stock) = update.in_stock {
        active.in_stock = Set(in_stock);
    }
    active.updated_at = Set(OffsetDateTime::now_utc());

    let model = active.update(conn).await?;
    Ok(Some(Product::from(model)))
}

/// Delete a product and any saved-list rows pointing at it.
pub async fn delete_product<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    product_id: i64,
) -> Result<bool, DomainError> {
    saved_products::Entity::delete_many()
        .filter(saved_products::Column::ProductId.eq(product_id))
        .exec(conn)
        .await?;
    let result = products::Entity::delete_by_id(product_id).exec(conn).await?;
    Ok(result.rows_affected > 0)
}

impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            image: model.image,
            category: model.category,
            quantity: model.quantity,
            in_stock: model.in_stock,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
