//! Builders wiring Diesel repositories into the domain services.

use std::sync::Arc;

use actix_web::web;
use mockable::Clock;

use field_reports::domain::ports::{PasswordHasher, TokenIssuer};
use field_reports::domain::{
    AnalyticsService, AuthService, CredentialSupport, SubmissionService, UserAdminService,
};
use field_reports::inbound::http::cookies::RefreshCookie;
use field_reports::inbound::http::state::{HttpState, HttpStatePorts};
use field_reports::outbound::persistence::{
    DieselAnalyticsRepository, DieselAuditLog, DieselRefreshTokenRepository,
    DieselSubmissionRepository, DieselUserRepository,
};
use field_reports::outbound::security::{Argon2PasswordHasher, JwtTokenIssuer};

use super::ServerConfig;

/// Build the shared HTTP state from the configured pool and secrets.
pub(super) fn build_http_state(
    config: &ServerConfig,
    clock: &Arc<dyn Clock>,
) -> web::Data<HttpState> {
    let pool = &config.db_pool;
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let refresh_tokens = Arc::new(DieselRefreshTokenRepository::new(pool.clone()));
    let audit = Arc::new(DieselAuditLog::new(pool.clone()));
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::new());
    let issuer: Arc<dyn TokenIssuer> = Arc::new(JwtTokenIssuer::new(
        &config.jwt_secret,
        config.access_token_ttl,
        Arc::clone(clock),
    ));

    let auth = Arc::new(AuthService::new(
        Arc::clone(&users),
        Arc::clone(&refresh_tokens),
        Arc::clone(&audit),
        CredentialSupport {
            hasher: Arc::clone(&hasher),
            issuer,
            clock: Arc::clone(clock),
            refresh_ttl: config.refresh_token_ttl,
        },
    ));
    let admin = Arc::new(UserAdminService::new(
        users,
        refresh_tokens,
        Arc::clone(&audit),
        hasher,
        Arc::clone(clock),
    ));
    let submissions = Arc::new(SubmissionService::new(
        Arc::new(DieselSubmissionRepository::new(pool.clone())),
        audit,
        Arc::clone(clock),
    ));
    let analytics = Arc::new(AnalyticsService::new(
        Arc::new(DieselAnalyticsRepository::new(pool.clone())),
        Arc::clone(clock),
    ));

    web::Data::new(HttpState::new(
        HttpStatePorts {
            login: auth.clone(),
            account: auth,
            users: admin.clone(),
            users_command: admin,
            submissions: submissions.clone(),
            submissions_query: submissions,
            analytics,
        },
        RefreshCookie::new(config.cookie_secure, config.refresh_token_ttl),
    ))
}
