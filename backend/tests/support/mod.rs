//! Shared helper utilities for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! small helpers live here instead of being copied between suites.

pub mod cluster_skip;

pub use cluster_skip::handle_cluster_setup_failure;

/// Environment variable naming the PostgreSQL database used by the
/// repository suites.
pub const TEST_DATABASE_URL: &str = "REPORTING_TEST_DATABASE_URL";

/// Connection string for the test database, if one is configured.
///
/// Returns `None` after printing a skip marker when the variable is unset,
/// unless `REPORTING_REQUIRE_TEST_DATABASE` asks for a hard failure.
pub fn test_database_url() -> Option<String> {
    match std::env::var(TEST_DATABASE_URL) {
        Ok(url) if !url.trim().is_empty() => Some(url),
        _ => handle_cluster_setup_failure(format!("{TEST_DATABASE_URL} is not set")),
    }
}
