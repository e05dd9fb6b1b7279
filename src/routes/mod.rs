//! API route handlers.

pub mod auth;
pub mod dashboard;
pub mod upload;
pub mod vendors;

use crate::auth::{middleware::AppState, route_gate};
use crate::error::AppError;
use crate::middleware::security_headers;
use axum::extract::rejection::JsonRejection;
use axum::{routing::get, routing::post, Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

/// Multipart framing overhead allowed on top of the upload cap, so an
/// oversized file reaches the handler and gets a proper message.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Unwrap a JSON body, turning any rejection into a plain 400.
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "Rejected request body");
            Err(AppError::BadRequest("Invalid request body.".to_string()))
        }
    }
}

/// Build the API router with all endpoints.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Auth endpoints
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        // Vendor applications
        .route(
            "/api/vendors",
            get(vendors::list_applications).post(vendors::create_application),
        )
        // Certificate uploads
        .route("/api/upload", post(upload::upload_document))
        // Protected pages
        .route("/dashboard", get(dashboard::dashboard))
}

/// The complete application: API routes, static fallback, route gate and
/// response hardening.
pub fn app(state: AppState) -> Router {
    // Explicit CORS: deny all cross-origin requests (single-origin deployment).
    let cors = CorsLayer::new();

    api_router()
        .fallback_service(ServeDir::new(&state.config.static_dir))
        .layer(axum::extract::DefaultBodyLimit::max(
            state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            route_gate,
        ))
        .layer(cors)
        .layer(axum::middleware::from_fn(security_headers))
        .with_state(state)
}
