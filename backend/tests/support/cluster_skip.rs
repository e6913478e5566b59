//! Skip policy for suites that need a PostgreSQL database.
//!
//! Repository suites run against the database named by
//! `REPORTING_TEST_DATABASE_URL`. Without one they print a `SKIP-TEST-CLUSTER`
//! marker and return early. CI jobs that provision PostgreSQL set
//! `REPORTING_REQUIRE_TEST_DATABASE=1` so a missing database fails loudly
//! instead of passing silently.

/// Environment variable that turns a missing database into a failure.
pub const REQUIRE_TEST_DATABASE: &str = "REPORTING_REQUIRE_TEST_DATABASE";

/// Returns true when `REPORTING_REQUIRE_TEST_DATABASE` is set to a truthy
/// value.
///
/// Truthy values: "1", "true", "yes" (case-insensitive).
pub fn test_database_required() -> bool {
    std::env::var(REQUIRE_TEST_DATABASE)
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Handles database setup failures consistently across integration tests.
///
/// Prints a skip marker and returns `None` unless a database is required, in
/// which case it panics with the reason.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    skip_or_fail(test_database_required(), reason)
}

fn skip_or_fail<T>(required: bool, reason: impl std::fmt::Display) -> Option<T> {
    if required {
        panic!("Test database setup failed: {reason}. Unset {REQUIRE_TEST_DATABASE} to skip.");
    }
    eprintln!("SKIP-TEST-CLUSTER: {reason}");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_database_skips_by_default() {
        let outcome: Option<()> = skip_or_fail(false, "REPORTING_TEST_DATABASE_URL is not set");
        assert!(outcome.is_none());
    }

    #[test]
    #[should_panic(expected = "Test database setup failed: no database")]
    fn missing_database_fails_when_required() {
        let _: Option<()> = skip_or_fail(true, "no database");
    }
}
