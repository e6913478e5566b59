//! Service configuration loaded via OrthoConfig.
//!
//! Values come from `REPORTING_*` environment variables or the matching
//! command-line flags. Optional values fall back to the defaults applied by
//! the accessor methods; [`AppSettings::validate`] checks the values the
//! server cannot start without.

use std::fmt;
use std::net::SocketAddr;

use chrono::Duration;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::domain::{DEFAULT_ACCESS_TOKEN_MINUTES, DEFAULT_REFRESH_TOKEN_DAYS};
use crate::outbound::persistence::DEFAULT_MAX_CONNECTIONS;

/// Shortest accepted JWT signing secret, in bytes.
pub const MIN_JWT_SECRET_BYTES: usize = 32;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5001";
const DEFAULT_CEO_EMAIL: &str = "ceo@timesgroup.com";
const DEFAULT_CEO_PASSWORD: &str = "CEO@123";
const DEFAULT_LOGIN_RATE_LIMIT: u32 = 10;
const DEFAULT_LOGIN_RATE_WINDOW_SECS: u64 = 900;
const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";

/// Longest accepted access token lifetime: one day.
pub const MAX_ACCESS_TOKEN_MINUTES: i64 = 24 * 60;
/// Longest accepted refresh token lifetime: one year.
pub const MAX_REFRESH_TOKEN_DAYS: i64 = 365;

/// Configuration problems detected before the server starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("REPORTING_DATABASE_URL must be set")]
    MissingDatabaseUrl,
    #[error("REPORTING_JWT_SECRET must be set")]
    MissingJwtSecret,
    #[error("REPORTING_JWT_SECRET must be at least {min} bytes")]
    ShortJwtSecret { min: usize },
    #[error("bind address `{value}` is not a socket address")]
    InvalidBindAddr { value: String },
    #[error("{name} must be between 1 and {max}, got {value}")]
    InvalidTokenLifetime {
        name: &'static str,
        value: i64,
        max: i64,
    },
    #[error("frontend URL `{value}` is not an http(s) origin")]
    InvalidFrontendUrl { value: String },
}

/// Values the server cannot run without, checked by [`AppSettings::validate`].
pub struct RequiredSettings {
    pub database_url: String,
    pub jwt_secret: Zeroizing<String>,
    pub bind_addr: SocketAddr,
    /// Browser origin allowed to call the API with credentials.
    pub frontend_origin: String,
}

impl fmt::Debug for RequiredSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequiredSettings")
            .field("database_url", &"<redacted>")
            .field("jwt_secret", &"<redacted>")
            .field("bind_addr", &self.bind_addr)
            .field("frontend_origin", &self.frontend_origin)
            .finish()
    }
}

/// Service configuration.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "REPORTING")]
pub struct AppSettings {
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// HS256 signing secret for access tokens.
    pub jwt_secret: Option<String>,
    /// Listen address.
    pub bind_addr: Option<String>,
    /// Access token lifetime in minutes.
    pub access_token_minutes: Option<i64>,
    /// Refresh token lifetime in days.
    pub refresh_token_days: Option<i64>,
    /// Mark the refresh cookie `Secure`.
    pub cookie_secure: Option<bool>,
    /// Email of the account created on first start.
    pub ceo_email: Option<String>,
    /// Initial password of that account; must be changed at first login.
    pub ceo_initial_password: Option<String>,
    /// Create the CEO account when none exists.
    pub seed_ceo: Option<bool>,
    /// Apply pending migrations at startup.
    pub run_migrations: Option<bool>,
    /// Upper bound of the connection pool.
    pub db_max_connections: Option<u32>,
    /// Login attempts allowed per client address and window.
    pub login_rate_limit: Option<u32>,
    /// Length of the login rate window in seconds.
    pub login_rate_window_secs: Option<u64>,
    /// Key the login limiter on the `Forwarded`/`X-Forwarded-For` client
    /// address. Only enable behind a proxy that overwrites those headers.
    pub trust_forwarded_for: Option<bool>,
    /// Origin of the single-page app allowed by the CORS policy.
    pub frontend_url: Option<String>,
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("bind_addr", &self.bind_addr)
            .field("access_token_minutes", &self.access_token_minutes)
            .field("refresh_token_days", &self.refresh_token_days)
            .field("cookie_secure", &self.cookie_secure)
            .field("ceo_email", &self.ceo_email)
            .field("seed_ceo", &self.seed_ceo)
            .field("run_migrations", &self.run_migrations)
            .field("db_max_connections", &self.db_max_connections)
            .field("login_rate_limit", &self.login_rate_limit)
            .field("login_rate_window_secs", &self.login_rate_window_secs)
            .field("trust_forwarded_for", &self.trust_forwarded_for)
            .field("frontend_url", &self.frontend_url)
            .finish_non_exhaustive()
    }
}

impl AppSettings {
    /// Check the required values and parse the bind address.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the database URL or JWT secret is
    /// missing, the secret is shorter than [`MIN_JWT_SECRET_BYTES`], the bind
    /// address does not parse, a token lifetime is out of range, or the
    /// frontend URL is not an origin.
    pub fn validate(&self) -> Result<RequiredSettings, SettingsError> {
        let database_url = self
            .database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)?
            .to_owned();
        let secret = self
            .jwt_secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
            .ok_or(SettingsError::MissingJwtSecret)?;
        if secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(SettingsError::ShortJwtSecret {
                min: MIN_JWT_SECRET_BYTES,
            });
        }
        let raw_addr = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        let bind_addr = raw_addr
            .parse()
            .map_err(|_| SettingsError::InvalidBindAddr {
                value: raw_addr.to_owned(),
            })?;
        check_lifetime(
            "REPORTING_ACCESS_TOKEN_MINUTES",
            self.access_token_minutes,
            MAX_ACCESS_TOKEN_MINUTES,
        )?;
        check_lifetime(
            "REPORTING_REFRESH_TOKEN_DAYS",
            self.refresh_token_days,
            MAX_REFRESH_TOKEN_DAYS,
        )?;
        let frontend_origin = self.frontend_origin();
        if !is_http_origin(&frontend_origin) {
            return Err(SettingsError::InvalidFrontendUrl {
                value: frontend_origin,
            });
        }
        Ok(RequiredSettings {
            database_url,
            jwt_secret: Zeroizing::new(secret.to_owned()),
            bind_addr,
            frontend_origin,
        })
    }

    /// Access token lifetime, default 15 minutes.
    ///
    /// Out-of-range values fall back to the default; [`Self::validate`]
    /// reports them.
    pub fn access_token_ttl(&self) -> Duration {
        self.access_token_minutes
            .filter(|minutes| (1..=MAX_ACCESS_TOKEN_MINUTES).contains(minutes))
            .and_then(Duration::try_minutes)
            .unwrap_or_else(|| Duration::minutes(DEFAULT_ACCESS_TOKEN_MINUTES))
    }

    /// Refresh token lifetime, default 7 days.
    pub fn refresh_token_ttl(&self) -> Duration {
        self.refresh_token_days
            .filter(|days| (1..=MAX_REFRESH_TOKEN_DAYS).contains(days))
            .and_then(Duration::try_days)
            .unwrap_or_else(|| Duration::days(DEFAULT_REFRESH_TOKEN_DAYS))
    }

    /// CORS origin of the single-page app, without a trailing slash.
    pub fn frontend_origin(&self) -> String {
        self.frontend_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_FRONTEND_URL)
            .trim_end_matches('/')
            .to_owned()
    }

    pub fn trust_forwarded_for(&self) -> bool {
        self.trust_forwarded_for.unwrap_or(false)
    }

    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    pub fn ceo_email(&self) -> &str {
        self.ceo_email.as_deref().unwrap_or(DEFAULT_CEO_EMAIL)
    }

    pub fn ceo_initial_password(&self) -> Zeroizing<String> {
        Zeroizing::new(
            self.ceo_initial_password
                .as_deref()
                .unwrap_or(DEFAULT_CEO_PASSWORD)
                .to_owned(),
        )
    }

    pub fn seed_ceo(&self) -> bool {
        self.seed_ceo.unwrap_or(true)
    }

    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS)
    }

    /// Login attempts per window, default 10.
    pub fn login_rate_limit(&self) -> u32 {
        self.login_rate_limit
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_LOGIN_RATE_LIMIT)
    }

    /// Login rate window, default 15 minutes.
    pub fn login_rate_window(&self) -> Duration {
        let secs = self
            .login_rate_window_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_LOGIN_RATE_WINDOW_SECS);
        Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX / 1_000))
    }
}

fn check_lifetime(
    name: &'static str,
    value: Option<i64>,
    max: i64,
) -> Result<(), SettingsError> {
    match value {
        Some(value) if !(1..=max).contains(&value) => {
            Err(SettingsError::InvalidTokenLifetime { name, value, max })
        }
        _ => Ok(()),
    }
}

fn is_http_origin(origin: &str) -> bool {
    let Some(host) = origin
        .strip_prefix("https://")
        .or_else(|| origin.strip_prefix("http://"))
    else {
        return false;
    };
    !host.is_empty() && !host.contains(['/', '*', ' ', '?', '#'])
}
