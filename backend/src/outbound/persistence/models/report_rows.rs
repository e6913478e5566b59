//! Untyped rows loaded from `sql_query` reports.

use chrono::{DateTime, Utc};
use diesel::QueryableByName;
use diesel::sql_types::{BigInt, Bool, Integer, Jsonb, Nullable, Text, Timestamptz, Uuid as SqlUuid};
use uuid::Uuid;

/// Account listing row with the creator's email.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct UserSummaryRow {
    #[diesel(sql_type = SqlUuid)]
    pub id: Uuid,
    #[diesel(sql_type = Text)]
    pub email: String,
    #[diesel(sql_type = Text)]
    pub role: String,
    #[diesel(sql_type = Bool)]
    pub force_password_reset: bool,
    #[diesel(sql_type = Nullable<Timestamptz>)]
    pub last_login: Option<DateTime<Utc>>,
    #[diesel(sql_type = Timestamptz)]
    pub created_at: DateTime<Utc>,
    #[diesel(sql_type = Nullable<Text>)]
    pub created_by_email: Option<String>,
}

/// Submission listing row.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct SummaryRow {
    #[diesel(sql_type = SqlUuid)]
    pub id: Uuid,
    #[diesel(sql_type = SqlUuid)]
    pub user_id: Uuid,
    #[diesel(sql_type = Text)]
    pub area: String,
    #[diesel(sql_type = Timestamptz)]
    pub submitted_at: DateTime<Utc>,
    #[diesel(sql_type = Text)]
    pub submission_type: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub user_email: Option<String>,
}

/// Export row; `details` holds the type-specific columns.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct ExportRow {
    #[diesel(sql_type = SqlUuid)]
    pub id: Uuid,
    #[diesel(sql_type = Text)]
    pub submission_type: String,
    #[diesel(sql_type = Timestamptz)]
    pub submitted_at: DateTime<Utc>,
    #[diesel(sql_type = Nullable<Text>)]
    pub user_email: Option<String>,
    #[diesel(sql_type = Text)]
    pub area: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub accompanied_by: Option<String>,
    #[diesel(sql_type = Jsonb)]
    pub details: serde_json::Value,
}

/// Single `COUNT(*)`.
#[derive(Debug, Clone, Copy, QueryableByName)]
pub(crate) struct CountRow {
    #[diesel(sql_type = BigInt)]
    pub total: i64,
}

/// Distinct area.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct AreaRow {
    #[diesel(sql_type = Text)]
    pub area: String,
}

/// Grouped count.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct KeyCountRow {
    #[diesel(sql_type = Text)]
    pub key: String,
    #[diesel(sql_type = BigInt)]
    pub count: i64,
}

/// Count for one calendar month (1-12).
#[derive(Debug, Clone, Copy, QueryableByName)]
pub(crate) struct MonthCountRow {
    #[diesel(sql_type = Integer)]
    pub month: i32,
    #[diesel(sql_type = BigInt)]
    pub count: i64,
}
