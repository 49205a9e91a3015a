use sea_orm::entity::prelude::*;
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub image: String,
    pub category: String,
    /// Free-form quantity text, e.g. "500g" or "12"
    pub quantity: String,
    #[sea_orm(column_name = "in_stock")]
    pub in_stock: bool,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::saved_products::Entity")]
    SavedProducts,
}

impl Related<super::saved_products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SavedProducts.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        super::saved_products::Relation::User.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::saved_products::Relation::Product.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
