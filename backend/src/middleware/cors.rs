//! Cross-origin policy for the single-page app.
//!
//! Only the configured frontend origin may call the API, and it may send
//! credentials so the HttpOnly refresh cookie reaches `/auth/refresh`.

use actix_cors::Cors;
use actix_web::http::Method;
use actix_web::http::header::{self, HeaderName};

use crate::domain::TRACE_ID_HEADER;

const PREFLIGHT_MAX_AGE_SECS: usize = 3600;

/// Credentialed CORS policy admitting `origin` only.
///
/// `origin` must be a concrete `scheme://host[:port]` value; browsers reject
/// a wildcard alongside credentials.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use field_reports::middleware::cors_policy;
///
/// let app = App::new().wrap(cors_policy("http://localhost:3000"));
/// ```
pub fn cors_policy(origin: &str) -> Cors {
    let trace_id = HeaderName::from_static(TRACE_ID_HEADER);
    Cors::default()
        .allowed_origin(origin)
        .allowed_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allowed_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            trace_id.clone(),
        ])
        .expose_headers([trace_id, header::CONTENT_DISPOSITION])
        .supports_credentials()
        .max_age(PREFLIGHT_MAX_AGE_SECS)
}
