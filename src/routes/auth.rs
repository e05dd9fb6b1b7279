//! Auth API endpoints.

use super::json_body;
use crate::auth::cookie::{clear_cookie, issue_cookie};
use crate::auth::middleware::{AppState, AuthUser};
use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::models::{LoginRequest, SignupRequest, StoredUser};
use crate::storage;
use crate::storage::user::InsertOutcome;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use zeroize::Zeroizing;

pub const MIN_PASSWORD_LEN: usize = 6;

const INVALID_CREDENTIALS: &str = "Invalid email or password.";

/// Issue a session token for `user` and wrap it in the session cookie.
fn session_jar(state: &AppState, user: &StoredUser) -> Result<CookieJar, AppError> {
    let token = state.tokens.issue(&user.identity())?;
    Ok(CookieJar::new().add(issue_cookie(token, state.config.production)))
}

/// POST /api/auth/signup: Create an account and start a session
pub async fn signup(
    State(state): State<AppState>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let req = json_body(body)?;

    if req.name.is_empty() || req.email.is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Name, email, and password are required.".to_string(),
        ));
    }

    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters.",
            MIN_PASSWORD_LEN
        )));
    }

    // Hash on the blocking pool; the plaintext is wiped when the closure drops it.
    let password = Zeroizing::new(req.password);
    let cost = state.config.hash_cost;
    let password_hash =
        tokio::task::spawn_blocking(move || hash_password(&password, cost)).await??;

    // No pre-check: the store's atomic email claim decides duplicate races.
    let mut con = state.store.connection().await?;
    let user =
        match storage::user::insert_user(&mut con, &req.name, &req.email, &password_hash).await? {
            InsertOutcome::Created(user) => user,
            InsertOutcome::EmailTaken => {
                tracing::info!(action = "signup_conflict", "Signup for an existing email");
                return Err(AppError::Conflict(
                    "An account with this email already exists.".to_string(),
                ));
            }
        };

    let jar = session_jar(&state, &user)?;

    tracing::info!(action = "signup", user_id = user.id, "Account created");

    Ok((StatusCode::CREATED, jar, Json(user.public())))
}

/// POST /api/auth/login: Verify credentials and start a session
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let req = json_body(body)?;

    if req.email.is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required.".to_string(),
        ));
    }

    let password = Zeroizing::new(req.password);

    let mut con = state.store.connection().await?;
    let Some(user) = storage::user::get_user_by_email(&mut con, &req.email).await? else {
        tracing::warn!(action = "login_failed", reason = "unknown_email", "Login rejected");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    let hash = user.password_hash.clone();
    let password_ok =
        tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await?;
    if !password_ok {
        tracing::warn!(
            action = "login_failed",
            reason = "bad_password",
            user_id = user.id,
            "Login rejected"
        );
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let jar = session_jar(&state, &user)?;

    tracing::info!(action = "login", user_id = user.id, "User authenticated");

    Ok((jar, Json(user.public())))
}

/// POST /api/auth/logout: Clear the session cookie
///
/// The clearing cookie repeats every attribute of the issued one.
pub async fn logout(State(state): State<AppState>, session: Option<AuthUser>) -> impl IntoResponse {
    if let Some(AuthUser(claims)) = session {
        tracing::info!(action = "logout", user_id = claims.identity.user_id, "User logged out");
    }

    (
        CookieJar::new().add(clear_cookie(state.config.production)),
        Json(serde_json::json!({ "message": "Logged out" })),
    )
}
