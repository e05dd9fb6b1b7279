//! Route gate for session-protected pages.
//!
//! Every request gets its session resolved exactly once here and attached as
//! [`CurrentSession`]. Requests under a protected prefix additionally need a
//! valid session: without a cookie they are redirected to the login page;
//! with a cookie that fails verification they are redirected and the cookie
//! is cleared so the browser stops replaying it.

use crate::auth::cookie::{clear_cookie, session_token};
use crate::auth::middleware::{AppState, CurrentSession};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

/// Path prefixes that require a valid session. Sub-paths are covered too.
pub const PROTECTED_PREFIXES: &[&str] = &["/dashboard", "/vendors/new"];

pub const LOGIN_PATH: &str = "/login";

pub fn is_protected(path: &str) -> bool {
    PROTECTED_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
}

pub async fn route_gate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let token = session_token(&jar);
    let claims = token.as_deref().and_then(|t| state.tokens.verify(t));
    request
        .extensions_mut()
        .insert(CurrentSession(claims.clone()));

    let path = request.uri().path().to_string();
    if !is_protected(&path) {
        return next.run(request).await;
    }

    match (token, claims) {
        (None, _) => {
            tracing::debug!(path = %path, "No session, redirecting to login");
            Redirect::temporary(LOGIN_PATH).into_response()
        }
        (Some(_), None) => {
            tracing::info!(
                action = "session_rejected",
                path = %path,
                "Invalid session cookie cleared"
            );
            (
                jar.add(clear_cookie(state.config.production)),
                Redirect::temporary(LOGIN_PATH),
            )
                .into_response()
        }
        (Some(_), Some(_)) => next.run(request).await,
    }
}
