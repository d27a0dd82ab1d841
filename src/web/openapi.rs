//! OpenAPI document for the file API.

use utoipa::OpenApi;

use super::dto::{StoredFileResponse, UpdateExpirationRequest, UploadForm, UploadResponse};
use super::error::ErrorBody;
use super::handlers::file;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "secureshare",
        description = "Upload a file, get an id, tune its lifetime."
    ),
    paths(file::upload_file, file::get_file, file::update_file),
    components(schemas(
        UploadForm,
        UploadResponse,
        StoredFileResponse,
        UpdateExpirationRequest,
        ErrorBody
    )),
    tags((name = "files", description = "Stored file lifecycle"))
)]
pub struct ApiDoc;
