//! File API handlers.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use std::sync::Arc;

use crate::file::FileService;
use crate::web::dto::{
    JsonBody, StoredFileResponse, UpdateExpirationRequest, UploadForm, UploadResponse,
};
use crate::web::error::{ApiError, ErrorBody};
use crate::web::handlers::AppState;

/// Upload a file.
///
/// Request body: multipart/form-data with a "file" field.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "files",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "Malformed multipart, missing file part, or file too large", body = ErrorBody),
        (status = 500, description = "Empty file, unsafe filename, or storage failure", body = ErrorBody)
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut filename: Option<String> = None;
    let mut content: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("Failed to read multipart field: {}", e);
        ApiError::bad_request("Invalid multipart data")
    })? {
        if field.name() != Some("file") {
            continue;
        }

        filename = field.file_name().map(|s| s.to_string());
        content = Some(
            field
                .bytes()
                .await
                .map_err(|e| {
                    tracing::error!("Failed to read file content: {}", e);
                    ApiError::bad_request("Failed to read file")
                })?
                .to_vec(),
        );
    }

    let content =
        content.ok_or_else(|| ApiError::bad_request("Required part 'file' is not present."))?;

    if content.len() as u64 > state.max_upload_size {
        let max_mb = state.max_upload_size / 1024 / 1024;
        return Err(ApiError::bad_request(format!(
            "File too large (max {}MB)",
            max_mb
        )));
    }

    let service = FileService::new(&state.db, state.storage.as_ref());
    let id = service.store(filename.as_deref(), &content).await?;

    Ok(Json(UploadResponse { id }))
}

/// Get file metadata.
#[utoipa::path(
    get,
    path = "/{fileId}",
    tag = "files",
    params(
        ("fileId" = String, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File metadata", body = StoredFileResponse),
        (status = 404, description = "File not found", body = ErrorBody)
    )
)]
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<String>,
) -> Result<Json<StoredFileResponse>, ApiError> {
    let service = FileService::new(&state.db, state.storage.as_ref());
    let file = service.get_metadata(&file_id).await?;

    Ok(Json(file.into()))
}

/// Update file expiration and download allowance.
#[utoipa::path(
    put,
    path = "/{fileId}",
    tag = "files",
    params(
        ("fileId" = String, Path, description = "File ID")
    ),
    request_body = UpdateExpirationRequest,
    responses(
        (status = 200, description = "Updated file metadata", body = StoredFileResponse),
        (status = 400, description = "Malformed request body", body = ErrorBody),
        (status = 404, description = "File not found", body = ErrorBody)
    )
)]
pub async fn update_file(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<String>,
    JsonBody(req): JsonBody<UpdateExpirationRequest>,
) -> Result<Json<StoredFileResponse>, ApiError> {
    let service = FileService::new(&state.db, state.storage.as_ref());
    let file = service.update_expiration(&file_id, &req.into()).await?;

    Ok(Json(file.into()))
}
