//! Access-token cookie construction.

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};

use crate::auth::jwt::TOKEN_TTL;
use crate::config::app::RuntimeEnv;

/// Name of the cookie that carries the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Cookie attributes that vary by deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePolicy {
    pub secure: bool,
    pub same_site: SameSite,
}

impl CookiePolicy {
    /// Production serves the SPA from another origin over TLS, so the cookie
    /// must be `Secure; SameSite=None`. Development runs over plain http.
    pub fn for_env(env: RuntimeEnv) -> Self {
        if env.is_production() {
            Self {
                secure: true,
                same_site: SameSite::None,
            }
        } else {
            Self {
                secure: false,
                same_site: SameSite::Strict,
            }
        }
    }

    /// Cookie carrying a freshly issued token.
    pub fn access_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build(ACCESS_TOKEN_COOKIE, token)
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .max_age(CookieDuration::seconds(TOKEN_TTL.as_secs() as i64))
            .finish()
    }

    /// Cookie that makes the browser drop the access token.
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(ACCESS_TOKEN_COOKIE, "")
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .finish();
        cookie.make_removal();
        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_cookie_is_secure_and_cross_site() {
        let cookie = CookiePolicy::for_env(RuntimeEnv::Production).access_cookie("tok".into());

        assert_eq!(cookie.name(), ACCESS_TOKEN_COOKIE);
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
        assert_eq!(cookie.max_age(), Some(CookieDuration::hours(1)));
    }

    #[test]
    fn development_cookie_is_strict_and_not_secure() {
        let cookie = CookiePolicy::for_env(RuntimeEnv::Development).access_cookie("tok".into());

        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
    }

    #[test]
    fn removal_cookie_expires_immediately() {
        let cookie = CookiePolicy::for_env(RuntimeEnv::Development).removal_cookie();

        assert_eq!(cookie.name(), ACCESS_TOKEN_COOKIE);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
    }
}
