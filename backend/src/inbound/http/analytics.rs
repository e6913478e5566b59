//! Dashboard chart endpoints.
//!
//! ```text
//! GET /analytics/by-type?from=2025-03-01&to=2025-03-31
//! GET /analytics/by-area?from=&to=&limit=10
//! GET /analytics/by-user?from=&to=&limit=10
//! GET /analytics/by-month?year=2025
//! GET /analytics/summary
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{AnalyticsSummary, ChartData, DateRange, Error, MonthlyChart, TopLimit};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::CurrentUser;
use crate::inbound::http::state::HttpState;

/// Date window and bar count for the breakdown charts.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RangeQuery {
    /// First day, `YYYY-MM-DD`.
    pub from: Option<String>,
    /// Last day, `YYYY-MM-DD`.
    pub to: Option<String>,
    /// Number of bars, 1 to 50. Ignored by `by-type`.
    pub limit: Option<u32>,
}

impl RangeQuery {
    fn range(&self) -> Result<DateRange, Error> {
        Ok(DateRange::parse(self.from.as_deref(), self.to.as_deref())?)
    }

    fn top(&self) -> Result<TopLimit, Error> {
        Ok(TopLimit::new(self.limit)?)
    }
}

/// Year selector for the monthly chart.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MonthQuery {
    /// Calendar year, defaults to the current one.
    pub year: Option<i32>,
}

/// Submissions per type.
#[utoipa::path(
    get,
    path = "/analytics/by-type",
    params(RangeQuery),
    responses(
        (status = 200, description = "Counts per type, busiest first", body = ChartData),
        (status = 400, description = "Invalid range", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["analytics"],
    operation_id = "analyticsByType"
)]
#[get("/analytics/by-type")]
pub async fn by_type(
    state: web::Data<HttpState>,
    user: CurrentUser,
    query: web::Query<RangeQuery>,
) -> ApiResult<web::Json<ChartData>> {
    let range = query.range()?;
    state.analytics.by_type(&user, range).await.map(web::Json)
}

/// Busiest areas.
#[utoipa::path(
    get,
    path = "/analytics/by-area",
    params(RangeQuery),
    responses(
        (status = 200, description = "Top areas", body = ChartData),
        (status = 400, description = "Invalid range or limit", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["analytics"],
    operation_id = "analyticsByArea"
)]
#[get("/analytics/by-area")]
pub async fn by_area(
    state: web::Data<HttpState>,
    user: CurrentUser,
    query: web::Query<RangeQuery>,
) -> ApiResult<web::Json<ChartData>> {
    let (range, limit) = (query.range()?, query.top()?);
    state.analytics.by_area(&user, range, limit).await.map(web::Json)
}

/// Most active submitters, labelled by email.
#[utoipa::path(
    get,
    path = "/analytics/by-user",
    params(RangeQuery),
    responses(
        (status = 200, description = "Top submitters", body = ChartData),
        (status = 400, description = "Invalid range or limit", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["analytics"],
    operation_id = "analyticsByUser"
)]
#[get("/analytics/by-user")]
pub async fn by_user(
    state: web::Data<HttpState>,
    user: CurrentUser,
    query: web::Query<RangeQuery>,
) -> ApiResult<web::Json<ChartData>> {
    let (range, limit) = (query.range()?, query.top()?);
    state.analytics.by_user(&user, range, limit).await.map(web::Json)
}

/// Submissions per calendar month.
#[utoipa::path(
    get,
    path = "/analytics/by-month",
    params(MonthQuery),
    responses(
        (status = 200, description = "Twelve monthly counts", body = MonthlyChart),
        (status = 400, description = "Year out of range", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["analytics"],
    operation_id = "analyticsByMonth"
)]
#[get("/analytics/by-month")]
pub async fn by_month(
    state: web::Data<HttpState>,
    user: CurrentUser,
    query: web::Query<MonthQuery>,
) -> ApiResult<web::Json<MonthlyChart>> {
    state.analytics.by_month(&user, query.year).await.map(web::Json)
}

/// Headline counters.
#[utoipa::path(
    get,
    path = "/analytics/summary",
    responses(
        (status = 200, description = "Dashboard counters", body = AnalyticsSummary),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["analytics"],
    operation_id = "analyticsSummary"
)]
#[get("/analytics/summary")]
pub async fn summary(
    state: web::Data<HttpState>,
    user: CurrentUser,
) -> ApiResult<web::Json<AnalyticsSummary>> {
    state.analytics.summary(&user).await.map(web::Json)
}
