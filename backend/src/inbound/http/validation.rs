//! Shared validation helpers for inbound HTTP adapters.
//!
//! Body and query extractor failures are rewritten into `invalid_request`
//! errors so clients always receive the JSON error envelope.

use actix_web::{HttpRequest, error::JsonPayloadError, error::QueryPayloadError, web};
use pagination::{PageRequest, PageRequestError};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, SubmissionId, SubmissionType, UserId};

/// Largest page size accepted by list endpoints.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    const fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} is required")).with_details(json!({
        "field": field,
        "code": "missing_field",
    }))
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
        "field": field,
        "value": value,
        "code": "invalid_uuid",
    }))
}

fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value.trim()).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn parse_user_id(value: &str) -> Result<UserId, Error> {
    parse_uuid(value, FieldName::new("id")).map(UserId::from_uuid)
}

pub(crate) fn parse_submission_id(value: &str) -> Result<SubmissionId, Error> {
    parse_uuid(value, FieldName::new("id")).map(SubmissionId::from_uuid)
}

/// Parse an optional `type` filter, treating blanks as absent.
pub(crate) fn parse_optional_type(value: Option<&str>) -> Result<Option<SubmissionType>, Error> {
    value
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(|raw| raw.parse::<SubmissionType>().map_err(Error::from))
        .transpose()
}

/// Require a non-empty string field.
pub(crate) fn required(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .ok_or_else(|| missing_field_error(field))
}

pub(crate) fn page_request(page: Option<u32>, limit: Option<u32>) -> Result<PageRequest, Error> {
    PageRequest::new(page, limit, MAX_PAGE_LIMIT).map_err(|err| {
        let field = match err {
            PageRequestError::PageTooSmall => "page",
            PageRequestError::LimitOutOfRange { .. } => "limit",
        };
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": field,
            "code": "out_of_range",
        }))
    })
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::ContentType => "Content-Type must be application/json".to_owned(),
        other => format!("Invalid JSON body: {other}"),
    };
    Error::invalid_request(message).into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("Invalid query string: {err}")).into()
}

/// JSON extractor settings shared by every handler.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error)
}

/// Query extractor settings shared by every handler.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test as actix_test};
    use rstest::rstest;
    use serde::Deserialize;
    use serde_json::Value;

    #[rstest]
    #[case(Some(0), None, "page")]
    #[case(None, Some(0), "limit")]
    #[case(None, Some(101), "limit")]
    fn page_bounds_name_the_field(
        #[case] page: Option<u32>,
        #[case] limit: Option<u32>,
        #[case] field: &str,
    ) {
        let err = page_request(page, limit).expect_err("out of range");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.details().map(|d| d["field"].clone()), Some(json!(field)));
    }

    #[rstest]
    fn page_defaults_apply() {
        let page = page_request(None, None).expect("defaults");
        assert_eq!((page.page(), page.limit()), (1, 20));
    }

    #[rstest]
    fn invalid_ids_echo_the_value() {
        let err = parse_user_id("not-a-uuid").expect_err("invalid");
        assert_eq!(err.message(), "id must be a valid UUID");
        assert_eq!(
            err.details(),
            Some(&json!({ "field": "id", "value": "not-a-uuid", "code": "invalid_uuid" }))
        );
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("  "), None)]
    #[case(Some("ooh"), Some(SubmissionType::Ooh))]
    fn optional_type_parses(
        #[case] raw: Option<&str>,
        #[case] expected: Option<SubmissionType>,
    ) {
        assert_eq!(parse_optional_type(raw).expect("valid"), expected);
    }

    #[rstest]
    fn unknown_type_is_rejected() {
        let err = parse_optional_type(Some("kiosk")).expect_err("invalid");
        assert_eq!(err.message(), "Invalid submission type");
    }

    #[derive(Deserialize)]
    struct Body {
        email: String,
    }

    #[actix_web::test]
    async fn malformed_json_uses_error_envelope() {
        let app = actix_test::init_service(App::new().app_data(json_config()).route(
            "/",
            web::post().to(|body: web::Json<Body>| async move {
                HttpResponse::Ok().body(body.into_inner().email)
            }),
        ))
        .await;
        let req = actix_test::TestRequest::post()
            .uri("/")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"email\":")
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
    }
}
