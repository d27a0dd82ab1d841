//! Stored file metadata and its repository.

use chrono::{DateTime, Utc};

use crate::db::DbPool;
use crate::{Result, ShareError};

use super::expiration::Lifecycle;

/// Metadata describing one uploaded blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Unique, externally visible handle.
    pub id: String,
    /// Absolute path of the underlying bytes.
    pub storage_path: String,
    /// Byte length at upload time.
    pub size_bytes: i64,
    /// When the file was uploaded. Never changes.
    pub created_at: DateTime<Utc>,
    /// After this instant the file is purgeable.
    pub expires_at: DateTime<Utc>,
    /// Total download allowance ever granted.
    pub max_downloads: i32,
    /// Downloads still permitted.
    pub downloads_remaining: i32,
}

impl StoredFile {
    /// Create a record from its identity and a computed lifecycle.
    pub fn new(
        id: impl Into<String>,
        storage_path: impl Into<String>,
        size_bytes: i64,
        lifecycle: Lifecycle,
    ) -> Self {
        Self {
            id: id.into(),
            storage_path: storage_path.into(),
            size_bytes,
            created_at: lifecycle.created_at,
            expires_at: lifecycle.expires_at,
            max_downloads: lifecycle.max_downloads,
            downloads_remaining: lifecycle.downloads_remaining,
        }
    }
}

/// A record removed by [`StoredFileRepository::delete_expired`].
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PurgedFile {
    /// Id of the deleted record.
    pub id: String,
    /// Blob path the record pointed at.
    pub storage_path: String,
}

#[derive(sqlx::FromRow)]
struct StoredFileRow {
    id: String,
    storage_path: String,
    size_bytes: i64,
    created_at: i64,
    expires_at: i64,
    max_downloads: i32,
    downloads_remaining: i32,
}

impl TryFrom<StoredFileRow> for StoredFile {
    type Error = ShareError;

    fn try_from(row: StoredFileRow) -> Result<Self> {
        Ok(Self {
            created_at: from_unix(row.created_at)?,
            expires_at: from_unix(row.expires_at)?,
            id: row.id,
            storage_path: row.storage_path,
            size_bytes: row.size_bytes,
            max_downloads: row.max_downloads,
            downloads_remaining: row.downloads_remaining,
        })
    }
}

fn from_unix(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| ShareError::Database(format!("timestamp out of range: {secs}")))
}

/// Repository for stored file metadata.
pub struct StoredFileRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> StoredFileRepository<'a> {
    /// Create a new repository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Get a record by id.
    pub async fn get(&self, id: &str) -> Result<Option<StoredFile>> {
        let row = sqlx::query_as::<_, StoredFileRow>(
            "SELECT id, storage_path, size_bytes, created_at, expires_at,
                    max_downloads, downloads_remaining
             FROM stored_files WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(StoredFile::try_from).transpose()
    }

    /// Check whether a record with this id exists.
    pub async fn exists(&self, id: &str) -> Result<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM stored_files WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(found.is_some())
    }

    /// Insert or replace a record. Last write wins on `id`.
    pub async fn upsert(&self, file: &StoredFile) -> Result<()> {
        sqlx::query(
            "INSERT INTO stored_files
                (id, storage_path, size_bytes, created_at, expires_at,
                 max_downloads, downloads_remaining)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                storage_path = excluded.storage_path,
                size_bytes = excluded.size_bytes,
                created_at = excluded.created_at,
                expires_at = excluded.expires_at,
                max_downloads = excluded.max_downloads,
                downloads_remaining = excluded.downloads_remaining",
        )
        .bind(&file.id)
        .bind(&file.storage_path)
        .bind(file.size_bytes)
        .bind(file.created_at.timestamp())
        .bind(file.expires_at.timestamp())
        .bind(file.max_downloads)
        .bind(file.downloads_remaining)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Check whether any record still points at this blob path.
    pub async fn path_in_use(&self, storage_path: &str) -> Result<bool> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM stored_files WHERE storage_path = ? LIMIT 1")
                .bind(storage_path)
                .fetch_optional(self.pool)
                .await?;
        Ok(found.is_some())
    }

    /// Delete every record with `expires_at < now` in one statement.
    ///
    /// Returns the deleted ids with their blob paths for cascading.
    pub async fn delete_expired(&self, now: DateTime<Utc>) -> Result<Vec<PurgedFile>> {
        // Stored expiries are whole seconds: `e < now` holds for every
        // `e <= floor(now)` once `now` has a fractional part.
        let cutoff = now.timestamp() + i64::from(now.timestamp_subsec_nanos() > 0);
        let purged = sqlx::query_as::<_, PurgedFile>(
            "DELETE FROM stored_files WHERE expires_at < ? RETURNING id, storage_path",
        )
        .bind(cutoff)
        .fetch_all(self.pool)
        .await?;

        Ok(purged)
    }

    /// Count all records.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stored_files")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
