//! Vendor application endpoints.

use super::json_body;
use crate::auth::middleware::{AppState, AuthUser};
use crate::error::AppError;
use crate::models::NewApplicationRequest;
use crate::storage;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

/// GET /api/vendors: The caller's applications, newest first
pub async fn list_applications(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state.store.connection().await?;
    let applications =
        storage::vendor::list_applications(&mut con, claims.identity.user_id).await?;

    Ok(Json(applications))
}

/// POST /api/vendors: Submit a new application
pub async fn create_application(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    body: Result<Json<NewApplicationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let req = json_body(body)?;

    if req.vendor_name.is_empty() || req.stall_type.is_empty() || req.license_number.is_empty() {
        return Err(AppError::BadRequest("All fields are required.".to_string()));
    }

    let mut con = state.store.connection().await?;
    let application =
        storage::vendor::insert_application(&mut con, claims.identity.user_id, req).await?;

    tracing::info!(
        action = "application_created",
        application_id = application.id,
        user_id = application.user_id,
        "Vendor application submitted"
    );

    Ok((StatusCode::CREATED, Json(application)))
}
