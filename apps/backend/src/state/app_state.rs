use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;

/// Application state containing shared resources
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database connection (optional for test scenarios)
    pub db: Option<DatabaseConnection>,
    /// Token signing and password hashing settings
    pub security: SecurityConfig,
}

impl AppState {
    pub fn new(db: DatabaseConnection, security: SecurityConfig) -> Self {
        Self {
            db: Some(db),
            security,
        }
    }

    /// State without a database; routes that need one answer 503.
    pub fn without_db(security: SecurityConfig) -> Self {
        Self { db: None, security }
    }

    #[cfg(test)]
    pub fn for_tests_without_db() -> Self {
        Self::without_db(SecurityConfig::for_tests())
    }
}
