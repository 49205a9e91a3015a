//! Unique test data, so tests sharing a database never collide.

use ulid::Ulid;

/// `{prefix}-{ulid}`
pub fn unique_str(prefix: &str) -> String {
    format!("{prefix}-{}", Ulid::new())
}

/// `{prefix}-{ulid}@example.test`, already lowercase so it survives email
/// normalization unchanged.
///
/// ```
/// use backend_test_support::unique_helpers::unique_email;
///
/// let a = unique_email("shopper");
/// assert_ne!(a, unique_email("shopper"));
/// assert!(a.ends_with("@example.test"));
/// ```
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new()).to_lowercase()
}
