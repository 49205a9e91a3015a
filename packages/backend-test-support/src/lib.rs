//! Shared helpers for backend tests: one-time logging setup, problem
//! details assertions and unique test data.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;
