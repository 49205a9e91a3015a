//! Infrastructure layer: database connection, state building and
//! database error translation.

pub mod db;
pub mod db_errors;
pub mod state;
