//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint from the inbound layer, the DTOs
//! they exchange and the bearer-token security scheme. The document is served
//! by Swagger UI in debug builds and printed by the `openapi-dump` binary.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    AnalyticsSummary, ChartData, CollectionMode, Error, ErrorCode, MonthlyChart, NewspaperCount,
    Role, SubmissionDraft, SubmissionRecord, SubmissionSummary, SubmissionType, UserIdentity,
    UserProfile, UserSummary,
};
use crate::inbound::http::auth::{
    ChangePasswordRequest, ForceResetRequest, LoginRequest, SessionResponse,
};
use crate::inbound::http::health::HealthStatus;
use crate::inbound::http::schemas::{MessageResponse, PageMetaSchema, SubmissionPageSchema};
use crate::inbound::http::submissions::CreatedSubmissionResponse;
use crate::inbound::http::users::{
    ChangeRoleRequest, CreateUserRequest, CreatedUserResponse, ResetPasswordRequest,
};

/// Name of the bearer security scheme.
pub const BEARER_SCHEME: &str = "bearerAuth";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Access token returned by POST /auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Field reports API",
        description = "Field visit reporting, review, export and dashboard analytics."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("bearerAuth" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::refresh,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::force_reset,
        crate::inbound::http::auth::reset_password,
        crate::inbound::http::auth::me,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::reset_user_password,
        crate::inbound::http::users::change_role,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::submissions::create_submission,
        crate::inbound::http::submissions::list_submissions,
        crate::inbound::http::submissions::list_areas,
        crate::inbound::http::submissions::export_submissions,
        crate::inbound::http::submissions::get_submission,
        crate::inbound::http::analytics::by_type,
        crate::inbound::http::analytics::by_area,
        crate::inbound::http::analytics::by_user,
        crate::inbound::http::analytics::by_month,
        crate::inbound::http::analytics::summary,
        crate::inbound::http::health::health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Role,
        UserIdentity,
        UserProfile,
        UserSummary,
        SubmissionType,
        CollectionMode,
        NewspaperCount,
        SubmissionDraft,
        SubmissionRecord,
        SubmissionSummary,
        ChartData,
        MonthlyChart,
        AnalyticsSummary,
        LoginRequest,
        SessionResponse,
        ForceResetRequest,
        ChangePasswordRequest,
        CreateUserRequest,
        CreatedUserResponse,
        ResetPasswordRequest,
        ChangeRoleRequest,
        CreatedSubmissionResponse,
        MessageResponse,
        PageMetaSchema,
        SubmissionPageSchema,
        HealthStatus,
    )),
    tags(
        (name = "auth", description = "Sessions and password self-service"),
        (name = "users", description = "Account administration"),
        (name = "submissions", description = "Field visit reports"),
        (name = "analytics", description = "Dashboard charts"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
