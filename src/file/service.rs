//! File service for secureshare.
//!
//! Orchestrates the upload, metadata lookup and expiration update flows
//! over the blob store and the metadata repository.

use std::path::Path;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::db::Database;
use crate::{Result, ShareError};

use super::expiration::{self, ExpirationDetails};
use super::id::generate_id;
use super::metadata::{StoredFile, StoredFileRepository};
use super::path_guard;
use super::storage::BlobStore;

/// Attempts at minting an id that no existing record uses.
const MAX_ID_ATTEMPTS: usize = 5;

/// File service for storing files and managing their expiration.
pub struct FileService<'a> {
    db: &'a Database,
    storage: &'a dyn BlobStore,
}

impl<'a> FileService<'a> {
    /// Create a new FileService.
    pub fn new(db: &'a Database, storage: &'a dyn BlobStore) -> Self {
        Self { db, storage }
    }

    /// Store an uploaded file and register its metadata.
    ///
    /// Returns the new file id.
    pub async fn store(&self, filename: Option<&str>, content: &[u8]) -> Result<String> {
        if content.is_empty() {
            return Err(ShareError::Storage("Failed to store empty file.".to_string()));
        }

        let dest = path_guard::resolve(self.storage.root(), filename).inspect_err(|e| {
            warn!("Rejected upload {:?}: {}", filename, e);
        })?;

        let size_bytes = i64::try_from(content.len())
            .map_err(|_| ShareError::Storage("Failed to store file.".to_string()))?;

        self.storage.write(&dest, content)?;

        let id = match self.register(&dest, size_bytes).await {
            Ok(id) => id,
            Err(e) => {
                self.discard_blob(&dest).await;
                return Err(e);
            }
        };

        info!(
            "Received file {:?} ({} bytes) as {}",
            dest.file_name().unwrap_or_default(),
            size_bytes,
            id
        );
        Ok(id)
    }

    async fn register(&self, dest: &Path, size_bytes: i64) -> Result<String> {
        let id = self.mint_unique_id().await?;
        let record = StoredFile::new(
            id,
            dest.to_string_lossy(),
            size_bytes,
            expiration::initial_policy(Utc::now()),
        );
        StoredFileRepository::new(self.db.pool())
            .upsert(&record)
            .await
            .inspect_err(|e| error!("Failed to save metadata for {}: {}", record.id, e))?;
        Ok(record.id)
    }

    /// Remove a blob written for an upload that was not registered.
    ///
    /// A blob another record still points at is kept.
    async fn discard_blob(&self, dest: &Path) {
        let path = dest.to_string_lossy();
        if let Ok(true) = StoredFileRepository::new(self.db.pool())
            .path_in_use(&path)
            .await
        {
            return;
        }
        if let Err(e) = self.storage.delete(dest) {
            warn!("Failed to remove unregistered blob {}: {}", path, e);
        }
    }

    /// Get the metadata of a stored file.
    pub async fn get_metadata(&self, id: &str) -> Result<StoredFile> {
        info!("Fetching metadata for file {}", id);

        StoredFileRepository::new(self.db.pool())
            .get(id)
            .await?
            .ok_or_else(|| {
                warn!("Metadata not found for file {}", id);
                ShareError::NotFound(format!("Failed to get metadata for file: {id}"))
            })
    }

    /// Change the expiry and download allowance of a stored file.
    ///
    /// Returns the updated record.
    pub async fn update_expiration(
        &self,
        id: &str,
        details: &ExpirationDetails,
    ) -> Result<StoredFile> {
        let repo = StoredFileRepository::new(self.db.pool());

        let existing = repo.get(id).await?.ok_or_else(|| {
            warn!("Cannot update expiration, file {} not found", id);
            ShareError::NotFound(format!("Failed to fetch file: {id}"))
        })?;

        let updated = expiration::apply_update(&existing, details)?;
        repo.upsert(&updated).await?;

        info!(
            "Updated expiration for file {}: expires at {}, {}/{} downloads remaining",
            id, updated.expires_at, updated.downloads_remaining, updated.max_downloads
        );
        Ok(updated)
    }

    async fn mint_unique_id(&self) -> Result<String> {
        let repo = StoredFileRepository::new(self.db.pool());
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = generate_id();
            if !repo.exists(&id).await? {
                return Ok(id);
            }
            warn!("Generated id {} already in use, retrying", id);
        }

        error!("Could not mint a unique id after {} attempts", MAX_ID_ATTEMPTS);
        Err(ShareError::Storage("Failed to store file.".to_string()))
    }
}
