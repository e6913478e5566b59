//! PostgreSQL persistence adapters.
//!
//! Concrete implementations of the driven ports, backed by Diesel with async
//! support from `diesel-async` and a `bb8` pool.
//!
//! - Repositories only translate between rows and domain types.
//! - Row structs (`models`) and the table schema (`schema`) stay private.
//! - Every Diesel and pool failure is mapped into the port's error enum.
//!
//! # Example
//!
//! ```ignore
//! use field_reports::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/reports")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod ceo_seed;
mod diesel_analytics_repository;
mod diesel_audit_log;
mod diesel_refresh_token_repository;
mod diesel_submission_repository;
mod diesel_user_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod report_query;
mod schema;

pub use ceo_seed::{SeedOutcome, seed_ceo};
pub use diesel_analytics_repository::DieselAnalyticsRepository;
pub use diesel_audit_log::DieselAuditLog;
pub use diesel_refresh_token_repository::DieselRefreshTokenRepository;
pub use diesel_submission_repository::DieselSubmissionRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DEFAULT_MAX_CONNECTIONS, DbPool, PoolConfig, PoolError};
