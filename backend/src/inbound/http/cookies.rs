//! Refresh token cookie handling.
//!
//! The refresh token never appears in a response body. It travels in an
//! HTTP-only, same-site cookie scoped to the `/auth` routes, so browser
//! scripts cannot read it and other paths never send it.

use actix_web::HttpRequest;
use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};

use crate::domain::RefreshToken;

/// Cookie carrying the refresh token.
pub const REFRESH_COOKIE: &str = "refreshToken";
/// Path the cookie is scoped to.
pub const REFRESH_COOKIE_PATH: &str = "/auth";

/// Attributes applied to every refresh cookie the API sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshCookie {
    secure: bool,
    max_age_secs: i64,
}

impl RefreshCookie {
    /// Cookie lasting `ttl`; `secure` restricts it to HTTPS.
    pub fn new(secure: bool, ttl: chrono::Duration) -> Self {
        Self {
            secure,
            max_age_secs: ttl.num_seconds().max(0),
        }
    }

    fn build(&self, value: String) -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE, value)
            .http_only(true)
            .same_site(SameSite::Strict)
            .path(REFRESH_COOKIE_PATH)
            .secure(self.secure)
            .max_age(CookieDuration::seconds(self.max_age_secs))
            .finish()
    }

    /// Cookie handing `token` to the browser.
    pub fn issue(&self, token: &RefreshToken) -> Cookie<'static> {
        self.build(token.expose().to_owned())
    }

    /// Cookie instructing the browser to drop the refresh token.
    pub fn clear(&self) -> Cookie<'static> {
        let mut cookie = self.build(String::new());
        cookie.make_removal();
        cookie
    }
}

/// Refresh token presented with `req`, if any.
pub fn presented_refresh_token(req: &HttpRequest) -> Option<RefreshToken> {
    req.cookie(REFRESH_COOKIE)
        .and_then(|cookie| RefreshToken::from_presented(cookie.value()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn issued_cookie_is_locked_down(#[case] secure: bool) {
        let settings = RefreshCookie::new(secure, chrono::Duration::days(7));
        let token = RefreshToken::generate();
        let cookie = settings.issue(&token);

        assert_eq!(cookie.name(), REFRESH_COOKIE);
        assert_eq!(cookie.value(), token.expose());
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.path(), Some(REFRESH_COOKIE_PATH));
        assert_eq!(cookie.secure(), Some(secure));
        assert_eq!(cookie.max_age(), Some(CookieDuration::seconds(7 * 24 * 3600)));
    }

    #[rstest]
    fn cleared_cookie_expires_immediately() {
        let cookie = RefreshCookie::new(true, chrono::Duration::days(7)).clear();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
        assert_eq!(cookie.path(), Some(REFRESH_COOKIE_PATH));
    }

    #[rstest]
    fn reads_presented_token() {
        let req = TestRequest::default()
            .cookie(Cookie::new(REFRESH_COOKIE, "abc123"))
            .to_http_request();
        let token = presented_refresh_token(&req).expect("token present");
        assert_eq!(token.expose(), "abc123");
    }

    #[rstest]
    fn blank_cookie_counts_as_absent() {
        let req = TestRequest::default()
            .cookie(Cookie::new(REFRESH_COOKIE, ""))
            .to_http_request();
        assert!(presented_refresh_token(&req).is_none());
        assert!(presented_refresh_token(&TestRequest::default().to_http_request()).is_none());
    }
}
