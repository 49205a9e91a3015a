//! Repository functions for the domain layer.

pub mod products;
pub mod users;
