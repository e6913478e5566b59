//! `UNION ALL` report queries across the six submission tables.
//!
//! Table names come from [`SubmissionType::table`] and are never user input;
//! every user-supplied value is a numbered bind parameter.

use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::sql_types::{BigInt, Text, Timestamptz, Uuid as SqlUuid};
use pagination::PageRequest;
use uuid::Uuid;

use crate::domain::{DateRange, SubmissionFilter, SubmissionType, TopLimit};

/// Bind value in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SqlBind {
    Uuid(Uuid),
    Text(String),
    Timestamp(DateTime<Utc>),
    BigInt(i64),
}

/// SQL text plus its binds.
#[derive(Debug, Clone, Default)]
pub(crate) struct ReportQuery {
    sql: String,
    binds: Vec<SqlBind>,
}

/// Grouping for chart queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GroupKey {
    SubmissionType,
    Area,
    UserEmail,
}

impl ReportQuery {
    fn placeholder(&mut self, bind: SqlBind) -> String {
        self.binds.push(bind);
        format!("${}", self.binds.len())
    }

    fn filter_conditions(&mut self, filter: &SubmissionFilter) -> Vec<String> {
        let mut conditions = Vec::new();
        if let Some(user_id) = filter.user_id {
            let slot = self.placeholder(SqlBind::Uuid(*user_id.as_uuid()));
            conditions.push(format!("s.user_id = {slot}"));
        }
        if let Some(pattern) = filter.area_pattern() {
            let slot = self.placeholder(SqlBind::Text(pattern));
            conditions.push(format!("s.area ILIKE {slot}"));
        }
        conditions.extend(self.range_conditions(&filter.range));
        conditions
    }

    fn range_conditions(&mut self, range: &DateRange) -> Vec<String> {
        let mut conditions = Vec::new();
        if let Some(from) = range.from() {
            let slot = self.placeholder(SqlBind::Timestamp(from));
            conditions.push(format!("s.submitted_at >= {slot}"));
        }
        if let Some(to) = range.to() {
            let slot = self.placeholder(SqlBind::Timestamp(to));
            conditions.push(format!("s.submitted_at <= {slot}"));
        }
        conditions
    }

    /// Page of listing rows, newest first.
    pub(crate) fn list(filter: &SubmissionFilter, page: PageRequest) -> Self {
        let mut query = Self::default();
        let conditions = query.filter_conditions(filter);
        let limit = query.placeholder(SqlBind::BigInt(i64::from(page.limit())));
        let offset = query.placeholder(SqlBind::BigInt(
            i64::try_from(page.offset()).unwrap_or(i64::MAX),
        ));
        query.sql = format!(
            "SELECT s.id, s.user_id, s.area, s.submitted_at, s.submission_type, \
             u.email::text AS user_email \
             FROM ({source}) s LEFT JOIN users u ON u.id = s.user_id{filter} \
             ORDER BY s.submitted_at DESC, s.id LIMIT {limit} OFFSET {offset}",
            source = union_of(&filter.types(), summary_columns),
            filter = where_clause(&conditions),
        );
        query
    }

    /// Number of rows [`Self::list`] pages through.
    pub(crate) fn count(filter: &SubmissionFilter) -> Self {
        let mut query = Self::default();
        let conditions = query.filter_conditions(filter);
        query.sql = format!(
            "SELECT COUNT(*) AS total FROM ({source}) s{filter}",
            source = union_of(&filter.types(), summary_columns),
            filter = where_clause(&conditions),
        );
        query
    }

    /// Every matching row with its type-specific columns as JSON.
    pub(crate) fn export(filter: &SubmissionFilter) -> Self {
        let mut query = Self::default();
        let conditions = query.filter_conditions(filter);
        query.sql = format!(
            "SELECT s.id, s.submission_type, s.submitted_at, u.email::text AS user_email, \
             s.area, s.accompanied_by, s.details \
             FROM ({source}) s LEFT JOIN users u ON u.id = s.user_id{filter} \
             ORDER BY s.submitted_at DESC, s.id",
            source = union_of(&filter.types(), export_columns),
            filter = where_clause(&conditions),
        );
        query
    }

    /// Distinct non-blank areas.
    pub(crate) fn areas(types: &[SubmissionType]) -> Self {
        let source = types
            .iter()
            .map(|kind| format!("SELECT area::text AS area FROM {}", kind.table()))
            .collect::<Vec<_>>()
            .join(" UNION ");
        Self {
            sql: format!(
                "SELECT a.area FROM ({source}) a WHERE btrim(a.area) <> '' ORDER BY a.area ASC"
            ),
            binds: Vec::new(),
        }
    }

    /// Submissions inside `range`.
    pub(crate) fn count_in_range(range: &DateRange) -> Self {
        let mut query = Self::default();
        let conditions = query.range_conditions(range);
        query.sql = format!(
            "SELECT COUNT(*) AS total FROM ({source}) s{filter}",
            source = union_of(&SubmissionType::ALL, summary_columns),
            filter = where_clause(&conditions),
        );
        query
    }

    /// Counts grouped by `key`, largest first, optionally capped.
    pub(crate) fn grouped(range: &DateRange, key: GroupKey, limit: Option<TopLimit>) -> Self {
        let mut query = Self::default();
        let conditions = query.range_conditions(range);
        let (column, join) = match key {
            GroupKey::SubmissionType => ("s.submission_type", ""),
            GroupKey::Area => ("s.area", ""),
            GroupKey::UserEmail => ("u.email::text", " JOIN users u ON u.id = s.user_id"),
        };
        let cap = limit
            .map(|top| format!(" LIMIT {}", query.placeholder(SqlBind::BigInt(top.get()))))
            .unwrap_or_default();
        query.sql = format!(
            "SELECT {column} AS key, COUNT(*) AS count FROM ({source}) s{join}{filter} \
             GROUP BY {column} ORDER BY count DESC, key ASC{cap}",
            source = union_of(&SubmissionType::ALL, summary_columns),
            filter = where_clause(&conditions),
        );
        query
    }

    /// Counts per UTC calendar month in `[start, end)`.
    pub(crate) fn monthly(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let mut query = Self::default();
        let lower = query.placeholder(SqlBind::Timestamp(start));
        let upper = query.placeholder(SqlBind::Timestamp(end));
        query.sql = format!(
            "SELECT EXTRACT(MONTH FROM s.submitted_at AT TIME ZONE 'UTC')::int AS month, \
             COUNT(*) AS count FROM ({source}) s \
             WHERE s.submitted_at >= {lower} AND s.submitted_at < {upper} \
             GROUP BY 1 ORDER BY 1",
            source = union_of(&SubmissionType::ALL, summary_columns),
        );
        query
    }

    /// Boxed Diesel query with every bind attached.
    pub(crate) fn into_boxed(self) -> BoxedSqlQuery<'static, Pg, SqlQuery> {
        let Self { sql, binds } = self;
        binds
            .into_iter()
            .fold(diesel::sql_query(sql).into_boxed(), |query, bind| match bind {
                SqlBind::Uuid(value) => query.bind::<SqlUuid, _>(value),
                SqlBind::Text(value) => query.bind::<Text, _>(value),
                SqlBind::Timestamp(value) => query.bind::<Timestamptz, _>(value),
                SqlBind::BigInt(value) => query.bind::<BigInt, _>(value),
            })
    }
}

fn summary_columns(kind: SubmissionType) -> String {
    format!(
        "t.id, t.user_id, t.area::text AS area, t.submitted_at, '{}'::text AS submission_type",
        kind.as_str()
    )
}

fn export_columns(kind: SubmissionType) -> String {
    let accompanied_by = if kind.supports_accompanied_by() {
        "t.accompanied_by::text"
    } else {
        "NULL::text"
    };
    format!(
        "{}, {accompanied_by} AS accompanied_by, \
         to_jsonb(t) - ARRAY['id', 'user_id', 'area', 'accompanied_by', 'submitted_at'] \
         AS details",
        summary_columns(kind)
    )
}

fn union_of(types: &[SubmissionType], columns: fn(SubmissionType) -> String) -> String {
    types
        .iter()
        .map(|kind| format!("SELECT {} FROM {} t", columns(*kind), kind.table()))
        .collect::<Vec<_>>()
        .join(" UNION ALL ")
}

fn where_clause(conditions: &[String]) -> String {
    if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    }
}
