//! Response DTOs for Web API.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::file::StoredFile;

/// Upload response.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Id of the stored file.
    #[schema(example = "aB3dE9z")]
    pub id: String,
}

/// Stored file metadata response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredFileResponse {
    /// File id.
    pub id: String,
    /// Absolute path of the stored blob.
    pub storage_path: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// Upload time (RFC 3339).
    pub created_at: DateTime<Utc>,
    /// Expiry time (RFC 3339).
    pub expires_at: DateTime<Utc>,
    /// Total download allowance.
    pub max_downloads: i32,
    /// Downloads still permitted. May be negative.
    pub downloads_remaining: i32,
}

impl From<StoredFile> for StoredFileResponse {
    fn from(file: StoredFile) -> Self {
        Self {
            id: file.id,
            storage_path: file.storage_path,
            size_bytes: file.size_bytes,
            created_at: file.created_at,
            expires_at: file.expires_at,
            max_downloads: file.max_downloads,
            downloads_remaining: file.downloads_remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::expiration::initial_policy;
    use chrono::TimeZone;

    #[test]
    fn test_stored_file_response_json() {
        let created = Utc.with_ymd_and_hms(2025, 12, 11, 9, 30, 0).unwrap();
        let file = StoredFile::new("aB3dE9z", "/srv/uploads/a.txt", 11, initial_policy(created));

        let json = serde_json::to_value(StoredFileResponse::from(file)).unwrap();

        assert_eq!(json["id"], "aB3dE9z");
        assert_eq!(json["storagePath"], "/srv/uploads/a.txt");
        assert_eq!(json["sizeBytes"], 11);
        assert_eq!(json["createdAt"], "2025-12-11T09:30:00Z");
        assert_eq!(json["expiresAt"], "2025-12-12T09:30:00Z");
        assert_eq!(json["maxDownloads"], 100);
        assert_eq!(json["downloadsRemaining"], 100);
    }
}
