//! Certificate upload endpoint.
//!
//! The file is validated and its metadata recorded with a placeholder URL;
//! the bytes are not persisted anywhere.

use crate::auth::middleware::{AppState, AuthUser};
use crate::error::AppError;
use crate::models::UploadResponse;
use crate::storage;
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

pub const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/jpg",
];

pub const PLACEHOLDER_FILE_URL: &str = "https://example.com/mock-file.jpg";

fn size_limit_error(max_bytes: usize) -> AppError {
    AppError::BadRequest(format!(
        "File size must be under {} MB.",
        max_bytes / (1024 * 1024)
    ))
}

/// A body cut off by the request size limit reports the size rule; any other
/// parse failure gets a fixed message so parser details stay server-side.
fn multipart_error(err: MultipartError, max_bytes: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return size_limit_error(max_bytes);
    }
    tracing::debug!(error = %err.body_text(), "Rejected multipart body");
    AppError::BadRequest("Invalid file upload.".to_string())
}

struct UploadedFile {
    file_name: String,
    content_type: String,
    size: usize,
}

/// POST /api/upload: Upload a certificate image
///
/// Accepts a multipart form with a "file" field.
pub async fn upload_document(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let max = state.config.max_upload_bytes;
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, max))?;

        file = Some(UploadedFile {
            file_name,
            content_type,
            size: bytes.len(),
        });
    }

    let file = file.ok_or_else(|| AppError::BadRequest("No file provided.".to_string()))?;

    if !ALLOWED_IMAGE_TYPES.contains(&file.content_type.as_str()) {
        return Err(AppError::BadRequest(
            "Only image files (JPEG, PNG, GIF, WebP) are allowed.".to_string(),
        ));
    }

    if file.size > max {
        return Err(size_limit_error(max));
    }

    let mut con = state.store.connection().await?;
    let document = storage::document::insert_document(
        &mut con,
        claims.identity.user_id,
        &file.file_name,
        PLACEHOLDER_FILE_URL,
    )
    .await?;

    tracing::info!(
        action = "document_uploaded",
        document_id = document.id,
        user_id = document.user_id,
        size = file.size,
        "Certificate recorded"
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            success: true,
            file_name: document.file_name,
            message: "File received (mock upload for production).".to_string(),
        }),
    ))
}
