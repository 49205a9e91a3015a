use storefront_backend::infra::state::build_state;
use storefront_backend::state::security_config::SecurityConfig;
use storefront_backend::{AppError, AppState};

/// Fresh migrated in-memory database per call, so tests never share rows.
pub const TEST_DB_URL: &str = "sqlite::memory:";

pub async fn build_test_state() -> Result<AppState, AppError> {
    build_state()
        .with_db_url(TEST_DB_URL)
        .with_security(SecurityConfig::for_tests())
        .build()
        .await
}
