//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod analytics;
pub mod auth;
pub mod cookies;
pub mod error;
pub mod health;
pub mod identity;
pub mod schemas;
pub mod state;
pub mod submissions;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register every authenticated endpoint.
///
/// `POST /auth/login` is left out so the server can wrap it in the login
/// rate limiter; health probes are mounted separately.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::refresh)
        .service(auth::logout)
        .service(auth::force_reset)
        .service(auth::reset_password)
        .service(auth::me)
        .service(users::list_users)
        .service(users::create_user)
        .service(users::reset_user_password)
        .service(users::change_role)
        .service(users::delete_user)
        .service(submissions::create_submission)
        .service(submissions::list_submissions)
        .service(submissions::list_areas)
        .service(submissions::export_submissions)
        .service(submissions::get_submission)
        .service(analytics::by_type)
        .service(analytics::by_area)
        .service(analytics::by_user)
        .service(analytics::by_month)
        .service(analytics::summary);
}
