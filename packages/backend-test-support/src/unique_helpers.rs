//! Unique test data, so tests sharing a directory never collide.

use ulid::Ulid;

/// `{prefix}-{ulid}@example.test`
///
/// ```
/// use backend_test_support::unique_helpers::unique_email;
///
/// let a = unique_email("admin");
/// assert_ne!(a, unique_email("admin"));
/// assert!(a.starts_with("admin-") && a.ends_with("@example.test"));
/// ```
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new().to_string().to_lowercase())
}

/// `{prefix}-{ulid}`, for secrets and names.
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}
