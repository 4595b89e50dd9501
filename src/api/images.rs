//! Serves uploaded recipe images.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::errors::AppError;
use crate::AppState;

/// GET /images/*path - Fetch a stored image.
pub async fn get_image(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    let blob = state
        .blobs
        .get(&path)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Image {} not found", path)))?;

    Ok(([(header::CONTENT_TYPE, blob.content_type)], blob.data).into_response())
}
