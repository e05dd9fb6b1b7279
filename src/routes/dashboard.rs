//! Dashboard: the signed-in user's applications and documents.

use crate::auth::middleware::{AppState, AuthUser};
use crate::error::AppError;
use crate::models::{DashboardResponse, PublicUser};
use crate::storage;
use axum::{extract::State, response::IntoResponse, Json};

/// GET /dashboard: Protected by the route gate
pub async fn dashboard(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.identity.user_id;

    let mut con = state.store.connection().await?;
    let applications = storage::vendor::list_applications(&mut con, user_id).await?;
    let documents = storage::document::list_documents(&mut con, user_id).await?;

    Ok(Json(DashboardResponse {
        user: PublicUser::from(&claims.identity),
        applications,
        documents,
    }))
}
