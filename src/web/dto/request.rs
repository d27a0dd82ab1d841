//! Request DTOs for Web API.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::file::ExpirationDetails;

/// Expiration update request.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpirationRequest {
    /// New total download allowance.
    #[schema(example = 67)]
    pub max_downloads: i32,
    /// New lifetime in seconds, counted from the file's creation time.
    #[schema(example = 241200)]
    pub expires_in_seconds: i64,
}

impl From<UpdateExpirationRequest> for ExpirationDetails {
    fn from(req: UpdateExpirationRequest) -> Self {
        Self {
            max_downloads: req.max_downloads,
            expires_in_seconds: req.expires_in_seconds,
        }
    }
}

/// Multipart upload form, for the API documentation only.
#[derive(Debug, ToSchema)]
pub struct UploadForm {
    /// File to store. Its filename becomes the stored blob name.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}
