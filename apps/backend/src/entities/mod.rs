pub mod products;
pub mod saved_products;
pub mod users;

pub use products::Entity as Products;
pub use products::Model as Product;
pub use saved_products::Entity as SavedProducts;
pub use saved_products::Model as SavedProduct;
pub use users::Entity as Users;
pub use users::Model as User;
