//! User repository functions (generic over `ConnectionTrait`).

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, ModelTrait,
    NotSet, QueryFilter, QueryOrder, Set,
};
use time::OffsetDateTime;

use crate::entities::{products, saved_products, users};
use crate::errors::domain::DomainError;
use crate::repos::products::Product;

/// User domain model. `password_hash` never leaves the service layer.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
}

/// Partial update; `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub is_admin: Option<bool>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.username.is_none()
            && self.password_hash.is_none()
            && self.is_admin.is_none()
    }
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    new_user: NewUser,
) -> Result<User, DomainError> {
    let now = OffsetDateTime::now_utc();
    let active = users::ActiveModel {
        id: NotSet,
        email: Set(new_user.email),
        username: Set(new_user.username),
        password_hash: Set(new_user.password_hash),
        is_admin: Set(new_user.is_admin),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = active.insert(conn).await?;
    Ok(User::from(model))
}

pub async fn find_user_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<User>, DomainError> {
    let model = users::Entity::find_by_id(user_id).one(conn).await?;
    Ok(model.map(User::from))
}

/// Exact match; callers normalize the email first.
pub async fn find_user_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<User>, DomainError> {
    let model = users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(conn)
        .await?;
    Ok(model.map(User::from))
}

pub async fn list_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<User>, DomainError> {
    let models = users::Entity::find()
        .order_by_asc(users::Column::Id)
        .all(conn)
        .await?;
    Ok(models.into_iter().map(User::from).collect())
}

/// Apply `update`; `Ok(None)` when the user does not exist.
pub async fn update_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    update: UserUpdate,
) -> Result<Option<User>, DomainError> {
    let Some(model) = users::Entity::find_by_id(user_id).one(conn).await? else {
        return Ok(None);
    };

    let mut active = model.into_active_model();
    if let Some(email) = update.email {
        active.email = Set(email);
    }
    if let Some(username) = update.username {
        active.username = Set(username);
    }
    if let Some(password_hash) = update.password_hash {
        active.password_hash = Set(password_hash);
    }
    if let Some(is_admin) = update.is_admin {
        active.is_admin = Set(is_admin);
    }
    active.updated_at = Set(OffsetDateTime::now_utc());

    let model = active.update(conn).await?;
    Ok(Some(User::from(model)))
}

/// Delete a user and their saved-product rows. Returns whether a user row
/// was removed.
pub async fn delete_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<bool, DomainError> {
    saved_products::Entity::delete_many()
        .filter(saved_products::Column::UserId.eq(user_id))
        .exec(conn)
        .await?;
    let result = users::Entity::delete_by_id(user_id).exec(conn).await?;
    Ok(result.rows_affected > 0)
}

/// Replace a user's saved list with `product_ids` (duplicates collapse).
pub async fn replace_saved_products<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    product_ids: &[i64],
) -> Result<(), DomainError> {
    saved_products::Entity::delete_many()
        .filter(saved_products::Column::UserId.eq(user_id))
        .exec(conn)
        .await?;

    let mut ids = product_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(());
    }

    let now = OffsetDateTime::now_utc();
    let rows = ids.into_iter().map(|product_id| saved_products::ActiveModel {
        user_id: Set(user_id),
        product_id: Set(product_id),
        created_at: Set(now),
    });
    saved_products::Entity::insert_many(rows)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

/// Saved product ids per user, for every id in `user_ids`.
pub async fn saved_product_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_ids: &[i64],
) -> Result<HashMap<i64, Vec<i64>>, DomainError> {
    let mut by_user: HashMap<i64, Vec<i64>> =
        user_ids.iter().map(|id| (*id, Vec::new())).collect();
    if user_ids.is_empty() {
        return Ok(by_user);
    }

    let rows = saved_products::Entity::find()
        .filter(saved_products::Column::UserId.is_in(user_ids.to_vec()))
        .order_by_asc(saved_products::Column::ProductId)
        .all(conn)
        .await?;
    for row in rows {
        by_user.entry(row.user_id).or_default().push(row.product_id);
    }
    Ok(by_user)
}

/// Full product records on a user's saved list, ordered by product id.
pub async fn saved_products_of<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<Product>, DomainError> {
    let Some(user) = users::Entity::find_by_id(user_id).one(conn).await? else {
        return Ok(Vec::new());
    };
    let models = user
        .find_related(products::Entity)
        .order_by_asc(products::Column::Id)
        .all(conn)
        .await?;
    Ok(models.into_iter().map(Product::from).collect())
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            username: model.username,
            password_hash: model.password_hash,
            is_admin: model.is_admin,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
