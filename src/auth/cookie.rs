//! Session cookie construction.
//!
//! Issuing and clearing share one builder so the clearing cookie carries the
//! exact path and flags of the original; browsers ignore a deletion whose
//! attributes do not match.

use crate::auth::token::SESSION_TTL_SECS;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

pub const SESSION_COOKIE: &str = "vendorify_token";

fn session_cookie(value: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

/// Cookie carrying a freshly issued session token.
pub fn issue_cookie(token: String, secure: bool) -> Cookie<'static> {
    session_cookie(token, SESSION_TTL_SECS as i64, secure)
}

/// Empty, immediately expiring session cookie.
pub fn clear_cookie(secure: bool) -> Cookie<'static> {
    session_cookie(String::new(), 0, secure)
}

/// Session token from the request cookies, if any.
pub fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}
