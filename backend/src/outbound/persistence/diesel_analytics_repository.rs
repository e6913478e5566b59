//! PostgreSQL-backed [`AnalyticsRepository`].

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AnalyticsRepository, AnalyticsRepositoryError};
use crate::domain::{CountBucket, DateRange, ReportYear, Role, TopLimit};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CountRow, KeyCountRow, MonthCountRow};
use super::pool::{DbPool, PoolError};
use super::report_query::{GroupKey, ReportQuery};
use super::schema::users;

/// Diesel implementation of the chart aggregates.
#[derive(Clone)]
pub struct DieselAnalyticsRepository {
    pool: DbPool,
}

impl DieselAnalyticsRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn grouped(
        &self,
        range: &DateRange,
        key: GroupKey,
        limit: Option<TopLimit>,
    ) -> Result<Vec<CountBucket>, AnalyticsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = ReportQuery::grouped(range, key, limit)
            .into_boxed()
            .load::<KeyCountRow>(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|row| CountBucket {
                key: row.key,
                count: row.count,
            })
            .collect())
    }
}

fn pool_error(error: PoolError) -> AnalyticsRepositoryError {
    map_pool_error(error, AnalyticsRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> AnalyticsRepositoryError {
    map_diesel_error(
        error,
        AnalyticsRepositoryError::query,
        AnalyticsRepositoryError::connection,
    )
}

#[async_trait]
impl AnalyticsRepository for DieselAnalyticsRepository {
    async fn count_by_type(
        &self,
        range: &DateRange,
    ) -> Result<Vec<CountBucket>, AnalyticsRepositoryError> {
        self.grouped(range, GroupKey::SubmissionType, None).await
    }

    async fn count_by_area(
        &self,
        range: &DateRange,
        limit: TopLimit,
    ) -> Result<Vec<CountBucket>, AnalyticsRepositoryError> {
        self.grouped(range, GroupKey::Area, Some(limit)).await
    }

    async fn count_by_user(
        &self,
        range: &DateRange,
        limit: TopLimit,
    ) -> Result<Vec<CountBucket>, AnalyticsRepositoryError> {
        self.grouped(range, GroupKey::UserEmail, Some(limit)).await
    }

    async fn count_by_month(
        &self,
        year: ReportYear,
    ) -> Result<Vec<(u32, i64)>, AnalyticsRepositoryError> {
        let year_start = |value: i32| {
            Utc.with_ymd_and_hms(value, 1, 1, 0, 0, 0)
                .single()
                .ok_or_else(|| AnalyticsRepositoryError::query(format!("invalid year {value}")))
        };
        let start = year_start(year.get())?;
        let end = year_start(year.get() + 1)?;

        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = ReportQuery::monthly(start, end)
            .into_boxed()
            .load::<MonthCountRow>(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows
            .into_iter()
            .filter_map(|row| u32::try_from(row.month).ok().map(|month| (month, row.count)))
            .collect())
    }

    async fn count_submissions(
        &self,
        range: &DateRange,
    ) -> Result<i64, AnalyticsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = ReportQuery::count_in_range(range)
            .into_boxed()
            .get_result::<CountRow>(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(row.total)
    }

    async fn count_field_users(&self) -> Result<i64, AnalyticsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        users::table
            .filter(users::role.eq(Role::User.as_str()))
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(diesel_error)
    }
}
