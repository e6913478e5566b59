//! First-run creation of the CEO account.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::UserPersistenceError;
use crate::domain::{Email, Role};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::NewUserRow;
use super::pool::DbPool;
use super::schema::users;

/// Result of [`seed_ceo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// A CEO account was created.
    Created,
    /// A CEO account already existed; nothing changed.
    AlreadyPresent,
}

/// Create the CEO account unless one exists.
///
/// The account is created with `force_password_reset` set, so the initial
/// password must be replaced at first login. An existing account with the
/// same email is left untouched.
///
/// # Errors
///
/// Returns [`UserPersistenceError`] when the database is unavailable.
pub async fn seed_ceo(
    pool: &DbPool,
    email: &Email,
    password_hash: &str,
    now: DateTime<Utc>,
) -> Result<SeedOutcome, UserPersistenceError> {
    let mut conn = pool
        .get()
        .await
        .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;
    let diesel_error = |err: diesel::result::Error| {
        map_diesel_error(
            err,
            UserPersistenceError::query,
            UserPersistenceError::connection,
        )
    };

    let existing: i64 = users::table
        .filter(users::role.eq(Role::Ceo.as_str()))
        .count()
        .get_result(&mut conn)
        .await
        .map_err(diesel_error)?;
    if existing > 0 {
        return Ok(SeedOutcome::AlreadyPresent);
    }

    let row = NewUserRow {
        id: Uuid::new_v4(),
        email: email.as_ref(),
        password_hash,
        role: Role::Ceo.as_str(),
        force_password_reset: true,
        created_by: None,
        created_at: now,
    };
    let inserted = diesel::insert_into(users::table)
        .values(&row)
        .on_conflict(users::email)
        .do_nothing()
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;
    if inserted == 0 {
        return Ok(SeedOutcome::AlreadyPresent);
    }
    info!(email = %email, "seeded CEO account");
    Ok(SeedOutcome::Created)
}
