//! Submission endpoints.
//!
//! ```text
//! POST /submissions {"type":"vendor","area":"Dadar","vendorName":"Sai News","phone":"9820012345"}
//! GET  /submissions?type=&area=&user=&from=&to=&page=&limit=
//! GET  /submissions/areas?type=
//! GET  /submissions/export?type=&area=&user=&from=&to=
//! GET  /submissions/{type}/{id}
//! ```

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, get, post, web};
use pagination::Paginated;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Error, NewSubmission, SubmissionDraft, SubmissionFilter, SubmissionId, SubmissionRecord,
    SubmissionSummary, SubmissionType,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::CurrentUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{page_request, parse_optional_type, parse_submission_id};

/// Filters shared by the listing and the export.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SubmissionQuery {
    /// Submission type.
    #[serde(rename = "type")]
    #[param(rename = "type")]
    pub submission_type: Option<String>,
    /// Case-insensitive substring of the area.
    pub area: Option<String>,
    /// Submitting user id.
    pub user: Option<String>,
    /// First day, `YYYY-MM-DD`.
    pub from: Option<String>,
    /// Last day, `YYYY-MM-DD`.
    pub to: Option<String>,
    /// One-based page number.
    pub page: Option<u32>,
    /// Page size, at most 100.
    pub limit: Option<u32>,
}

impl SubmissionQuery {
    fn filter(&self) -> Result<SubmissionFilter, Error> {
        SubmissionFilter::parse(
            self.submission_type.as_deref(),
            self.area.as_deref(),
            self.user.as_deref(),
            self.from.as_deref(),
            self.to.as_deref(),
        )
    }
}

/// Query of `GET /submissions/areas`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AreasQuery {
    #[serde(rename = "type")]
    #[param(rename = "type")]
    pub submission_type: Option<String>,
}

/// Body returned by `POST /submissions`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedSubmissionResponse {
    #[schema(value_type = String, format = Uuid)]
    pub id: SubmissionId,
    #[schema(example = "Submitted successfully")]
    pub message: String,
}

/// File a field visit report.
#[utoipa::path(
    post,
    path = "/submissions",
    request_body = SubmissionDraft,
    responses(
        (status = 201, description = "Submission stored", body = CreatedSubmissionResponse),
        (status = 400, description = "Invalid submission", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Password reset required", body = Error)
    ),
    tags = ["submissions"],
    operation_id = "createSubmission"
)]
#[post("/submissions")]
pub async fn create_submission(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<SubmissionDraft>,
) -> ApiResult<HttpResponse> {
    let submission = NewSubmission::from_draft(payload.into_inner())?;
    let id = state.submissions.create_submission(&user, submission).await?;
    Ok(HttpResponse::Created().json(CreatedSubmissionResponse {
        id,
        message: "Submitted successfully".to_owned(),
    }))
}

/// Page through submissions of every type.
#[utoipa::path(
    get,
    path = "/submissions",
    params(SubmissionQuery),
    responses(
        (status = 200, description = "Newest first", body = crate::inbound::http::schemas::SubmissionPageSchema),
        (status = 400, description = "Invalid filter", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["submissions"],
    operation_id = "listSubmissions"
)]
#[get("/submissions")]
pub async fn list_submissions(
    state: web::Data<HttpState>,
    user: CurrentUser,
    query: web::Query<SubmissionQuery>,
) -> ApiResult<web::Json<Paginated<SubmissionSummary>>> {
    let filter = query.filter()?;
    let page = page_request(query.page, query.limit)?;
    state
        .submissions_query
        .list_submissions(&user, filter, page)
        .await
        .map(web::Json)
}

/// Distinct areas, for filter drop-downs.
#[utoipa::path(
    get,
    path = "/submissions/areas",
    params(AreasQuery),
    responses(
        (status = 200, description = "Areas in alphabetical order", body = [String]),
        (status = 400, description = "Invalid type", body = Error)
    ),
    tags = ["submissions"],
    operation_id = "listAreas"
)]
#[get("/submissions/areas")]
pub async fn list_areas(
    state: web::Data<HttpState>,
    user: CurrentUser,
    query: web::Query<AreasQuery>,
) -> ApiResult<web::Json<Vec<String>>> {
    let submission_type = parse_optional_type(query.submission_type.as_deref())?;
    state
        .submissions_query
        .list_areas(&user, submission_type)
        .await
        .map(web::Json)
}

/// Download matching submissions as CSV.
#[utoipa::path(
    get,
    path = "/submissions/export",
    params(SubmissionQuery),
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv", body = String),
        (status = 400, description = "Invalid filter", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["submissions"],
    operation_id = "exportSubmissions"
)]
#[get("/submissions/export")]
pub async fn export_submissions(
    state: web::Data<HttpState>,
    user: CurrentUser,
    query: web::Query<SubmissionQuery>,
) -> ApiResult<HttpResponse> {
    let export = state
        .submissions_query
        .export_submissions(&user, query.filter()?)
        .await?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(export.filename)],
        })
        .body(export.csv))
}

/// A single submission with its type-specific fields.
#[utoipa::path(
    get,
    path = "/submissions/{type}/{id}",
    params(
        ("type" = String, Path, description = "Submission type"),
        ("id" = String, Path, description = "Submission identifier")
    ),
    responses(
        (status = 200, description = "Submission", body = SubmissionRecord),
        (status = 400, description = "Invalid type or id", body = Error),
        (status = 404, description = "Submission not found", body = Error)
    ),
    tags = ["submissions"],
    operation_id = "getSubmission"
)]
#[get("/submissions/{type}/{id}")]
pub async fn get_submission(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<SubmissionRecord>> {
    let (raw_type, raw_id) = path.into_inner();
    let submission_type = raw_type.parse::<SubmissionType>()?;
    let id = parse_submission_id(&raw_id)?;
    state
        .submissions_query
        .get_submission(&user, submission_type, id)
        .await
        .map(web::Json)
}

#[cfg(test)]
mod tests;
