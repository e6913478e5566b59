//! Fixed-window rate limiting for the login endpoint.
//!
//! Attempts are counted per client IP address in memory. Counters reset when
//! their window elapses, so limits do not survive a restart and are not
//! shared between replicas.
//!
//! Only `POST /auth/login` is limited. Refresh and profile calls run on every
//! page load of the app and stay unthrottled.
//!
//! The client is the TCP peer unless [`LoginRateLimit::trust_forwarded_for`]
//! is enabled, in which case the first `Forwarded`/`X-Forwarded-For` hop is
//! used. Enable it only behind a proxy that overwrites those headers.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use chrono::{DateTime, Duration, Utc};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use mockable::Clock;
use tracing::{debug, warn};

use crate::domain::Error as ApiError;

/// Message returned once a client exhausts its attempts.
pub const TOO_MANY_ATTEMPTS: &str = "Too many login attempts, please try again later";

#[derive(Debug, Clone, Copy)]
struct Window {
    started: DateTime<Utc>,
    attempts: u32,
}

struct Counters {
    limit: u32,
    window: Duration,
    clock: Arc<dyn Clock>,
    windows: Mutex<HashMap<Option<IpAddr>, Window>>,
}

fn parse_client(raw: &str) -> Option<IpAddr> {
    let raw = raw.trim();
    raw.parse::<IpAddr>()
        .ok()
        .or_else(|| raw.parse::<SocketAddr>().ok().map(|addr| addr.ip()))
}

fn client_of(req: &ServiceRequest, trust_forwarded_for: bool) -> Option<IpAddr> {
    let peer = req.peer_addr().map(|addr| addr.ip());
    if !trust_forwarded_for {
        return peer;
    }
    req.connection_info()
        .realip_remote_addr()
        .and_then(parse_client)
        .or(peer)
}

impl Counters {
    /// Count one attempt for `client`, returning whether it is allowed.
    fn admit(&self, client: Option<IpAddr>) -> bool {
        let now = self.clock.utc();
        let Ok(mut windows) = self.windows.lock() else {
            warn!("login rate limiter state poisoned; admitting request");
            return true;
        };
        windows.retain(|_, entry| now - entry.started < self.window);
        let entry = windows.entry(client).or_insert(Window {
            started: now,
            attempts: 0,
        });
        if entry.attempts >= self.limit {
            return false;
        }
        entry.attempts += 1;
        true
    }
}

/// Middleware limiting requests per client address within a fixed window.
///
/// Clone the same instance into every worker so they share counters.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use actix_web::{App, HttpResponse, web};
/// use chrono::Duration;
/// use field_reports::middleware::LoginRateLimit;
/// use mockable::DefaultClock;
///
/// let limiter = LoginRateLimit::new(10, Duration::minutes(15), Arc::new(DefaultClock));
/// let app = App::new().service(
///     web::resource("/auth/login")
///         .wrap(limiter.clone())
///         .route(web::post().to(|| async { HttpResponse::Ok().finish() })),
/// );
/// ```
#[derive(Clone)]
pub struct LoginRateLimit {
    counters: Arc<Counters>,
    trust_forwarded_for: bool,
}

impl LoginRateLimit {
    /// Allow `limit` requests per client every `window`.
    pub fn new(limit: u32, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            counters: Arc::new(Counters {
                limit,
                window,
                clock,
                windows: Mutex::new(HashMap::new()),
            }),
            trust_forwarded_for: false,
        }
    }

    /// Key clients by the forwarded address instead of the TCP peer.
    #[must_use]
    pub fn trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for LoginRateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = LoginRateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LoginRateLimitMiddleware {
            service,
            counters: Arc::clone(&self.counters),
            trust_forwarded_for: self.trust_forwarded_for,
        }))
    }
}

/// Service wrapper produced by [`LoginRateLimit`].
pub struct LoginRateLimitMiddleware<S> {
    service: S,
    counters: Arc<Counters>,
    trust_forwarded_for: bool,
}

impl<S, B> Service<ServiceRequest> for LoginRateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let client = client_of(&req, self.trust_forwarded_for);
        if !self.counters.admit(client) {
            debug!(client = ?client, "login rate limit exceeded");
            let response = req
                .error_response(ApiError::too_many_requests(TOO_MANY_ATTEMPTS))
                .map_into_right_body();
            return Box::pin(async move { Ok(response) });
        }
        let fut = self.service.call(req);
        Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
    }
}
