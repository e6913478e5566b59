//! Request middleware.
//!
//! Purpose: Define middleware components for request lifecycle concerns such as
//! tracing, cross-origin access and login throttling.

pub mod cors;
pub mod rate_limit;
pub mod trace;

pub use cors::cors_policy;
pub use rate_limit::LoginRateLimit;
pub use trace::Trace;
