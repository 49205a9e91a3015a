#![allow(dead_code, unused_imports)]

pub mod app_builder;
pub mod factory;
pub mod test_state;

pub use app_builder::create_test_app;
pub use factory::{bearer, seed_product, seed_user, SeededUser};
pub use test_state::build_test_state;
