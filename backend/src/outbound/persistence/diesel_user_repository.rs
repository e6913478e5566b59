//! PostgreSQL-backed [`UserRepository`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Uuid as SqlUuid};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, Role, UserAccount, UserId, UserSummary, UsersScope};

use super::error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow, UserSummaryRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Accounts visible to a scope, newest first. `$1` is the managing admin, or
/// `NULL` for every account.
const LIST_USERS_SQL: &str = r"
SELECT u.id, u.email::text AS email, u.role, u.force_password_reset, u.last_login,
       u.created_at, c.email::text AS created_by_email
FROM users u
LEFT JOIN users c ON c.id = u.created_by
WHERE $1::uuid IS NULL OR u.role = 'user' OR u.id = $1 OR u.created_by = $1
ORDER BY u.created_at DESC, u.id
";

/// Diesel implementation of the account store.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> UserPersistenceError {
    map_pool_error(error, UserPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn row_to_account(row: UserRow) -> Result<UserAccount, UserPersistenceError> {
    let email = Email::new(&row.email)
        .map_err(|err| UserPersistenceError::query(format!("stored email: {err}")))?;
    let role = row
        .role
        .parse::<Role>()
        .map_err(|err| UserPersistenceError::query(format!("stored role: {err}")))?;
    Ok(UserAccount {
        id: UserId::from_uuid(row.id),
        email,
        role,
        password_hash: row.password_hash,
        force_password_reset: row.force_password_reset,
        created_by: row.created_by.map(UserId::from_uuid),
        last_login: row.last_login,
        created_at: row.created_at,
    })
}

fn row_to_summary(row: UserSummaryRow) -> Result<UserSummary, UserPersistenceError> {
    Ok(UserSummary {
        id: UserId::from_uuid(row.id),
        email: Email::new(&row.email)
            .map_err(|err| UserPersistenceError::query(format!("stored email: {err}")))?,
        role: row
            .role
            .parse()
            .map_err(|err| UserPersistenceError::query(format!("stored role: {err}")))?,
        force_password_reset: row.force_password_reset,
        last_login: row.last_login,
        created_at: row.created_at,
        created_by: row.created_by_email,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        users::table
            .filter(users::id.eq(*id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(row_to_account)
            .transpose()
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(row_to_account)
            .transpose()
    }

    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewUserRow {
            id: *account.id.as_uuid(),
            email: account.email.as_ref(),
            password_hash: &account.password_hash,
            role: account.role.as_str(),
            force_password_reset: account.force_password_reset,
            created_by: account.created_by.map(|id| *id.as_uuid()),
            created_at: account.created_at,
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err) {
                    UserPersistenceError::duplicate_email(account.email.as_ref())
                } else {
                    diesel_error(err)
                }
            })
    }

    async fn list(&self, scope: UsersScope) -> Result<Vec<UserSummary>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let manager = match scope {
            UsersScope::All => None,
            UsersScope::ManagedBy(admin) => Some(*admin.as_uuid()),
        };
        diesel::sql_query(LIST_USERS_SQL)
            .bind::<Nullable<SqlUuid>, _>(manager)
            .load::<UserSummaryRow>(&mut conn)
            .await
            .map_err(diesel_error)?
            .into_iter()
            .map(row_to_summary)
            .collect()
    }

    async fn record_login(
        &self,
        id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::update(users::table.filter(users::id.eq(*id.as_uuid())))
            .set(users::last_login.eq(Some(at)))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn update_password(
        &self,
        id: &UserId,
        password_hash: &str,
        force_password_reset: bool,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::update(users::table.filter(users::id.eq(*id.as_uuid())))
            .set((
                users::password_hash.eq(password_hash),
                users::force_password_reset.eq(force_password_reset),
                users::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn update_role(&self, id: &UserId, role: Role) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::update(users::table.filter(users::id.eq(*id.as_uuid())))
            .set((
                users::role.eq(role.as_str()),
                users::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let removed = diesel::delete(users::table.filter(users::id.eq(*id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(removed > 0)
    }
}
