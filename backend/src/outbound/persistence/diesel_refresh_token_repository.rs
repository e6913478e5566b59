//! PostgreSQL-backed [`RefreshTokenRepository`].
//!
//! Only SHA-256 digests are stored. `consume` deletes and returns in one
//! statement so a token can be exchanged at most once even under concurrent
//! refreshes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{RefreshTokenRepository, RefreshTokenRepositoryError};
use crate::domain::{RefreshTokenHash, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::NewRefreshTokenRow;
use super::pool::{DbPool, PoolError};
use super::schema::refresh_tokens;

/// Diesel implementation of the refresh token store.
#[derive(Clone)]
pub struct DieselRefreshTokenRepository {
    pool: DbPool,
}

impl DieselRefreshTokenRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> RefreshTokenRepositoryError {
    map_pool_error(error, RefreshTokenRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> RefreshTokenRepositoryError {
    map_diesel_error(
        error,
        RefreshTokenRepositoryError::query,
        RefreshTokenRepositoryError::connection,
    )
}

#[async_trait]
impl RefreshTokenRepository for DieselRefreshTokenRepository {
    async fn store(
        &self,
        user_id: &UserId,
        token_hash: &RefreshTokenHash,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RefreshTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewRefreshTokenRow {
            user_id: *user_id.as_uuid(),
            token_hash: token_hash.as_str(),
            expires_at,
        };
        diesel::insert_into(refresh_tokens::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn consume(
        &self,
        token_hash: &RefreshTokenHash,
        now: DateTime<Utc>,
    ) -> Result<Option<UserId>, RefreshTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let owner = diesel::delete(
            refresh_tokens::table
                .filter(refresh_tokens::token_hash.eq(token_hash.as_str()))
                .filter(refresh_tokens::expires_at.gt(now)),
        )
        .returning(refresh_tokens::user_id)
        .get_result::<Uuid>(&mut conn)
        .await
        .optional()
        .map_err(diesel_error)?;
        Ok(owner.map(UserId::from_uuid))
    }

    async fn revoke(
        &self,
        token_hash: &RefreshTokenHash,
    ) -> Result<(), RefreshTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::delete(
            refresh_tokens::table.filter(refresh_tokens::token_hash.eq(token_hash.as_str())),
        )
        .execute(&mut conn)
        .await
        .map(|_| ())
        .map_err(diesel_error)
    }

    async fn revoke_all_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<(), RefreshTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let revoked =
            diesel::delete(refresh_tokens::table.filter(refresh_tokens::user_id.eq(*user_id.as_uuid())))
                .execute(&mut conn)
                .await
                .map_err(diesel_error)?;
        debug!(revoked, user_id = %user_id, "revoked refresh tokens");
        Ok(())
    }

    async fn purge_expired_for_user(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<(), RefreshTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::delete(
            refresh_tokens::table
                .filter(refresh_tokens::user_id.eq(*user_id.as_uuid()))
                .filter(refresh_tokens::expires_at.le(now)),
        )
        .execute(&mut conn)
        .await
        .map(|_| ())
        .map_err(diesel_error)
    }
}
