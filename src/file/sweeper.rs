//! Background purge of expired files.
//!
//! Metadata rows are deleted first, in a single statement; blobs are
//! deleted afterwards on a best-effort basis. A blob that cannot be
//! deleted is logged and left on disk. A blob still referenced by a
//! live record (same upload name) is kept.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::db::Database;
use crate::Result;

use super::metadata::StoredFileRepository;
use super::storage::BlobStore;

/// Default interval between sweeps (5 minutes).
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

/// Outcome of one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Ids whose metadata was deleted.
    pub purged: Vec<String>,
    /// Ids whose blob could not be deleted.
    pub blob_failures: Vec<String>,
}

/// Periodic purge of expired file records and their blobs.
pub struct Sweeper {
    db: Arc<Database>,
    storage: Arc<dyn BlobStore>,
    interval: Duration,
}

impl Sweeper {
    /// Create a sweeper with the default interval.
    pub fn new(db: Arc<Database>, storage: Arc<dyn BlobStore>) -> Self {
        Self {
            db,
            storage,
            interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
        }
    }

    /// Set the interval between sweeps.
    pub fn with_interval(mut self, secs: u64) -> Self {
        self.interval = Duration::from_secs(secs);
        self
    }

    /// Get the interval between sweeps.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run forever, sweeping once per interval.
    pub async fn run(self) {
        info!("Sweeper started (interval: {:?})", self.interval());

        let mut interval = tokio::time::interval(self.interval());

        // Skip the first immediate tick
        interval.tick().await;

        loop {
            interval.tick().await;

            if let Err(e) = self.sweep().await {
                warn!(error = %e, "Sweep failed");
            }
        }
    }

    /// Sweep against the current time.
    pub async fn sweep(&self) -> Result<SweepReport> {
        self.sweep_at(Utc::now()).await
    }

    /// Purge every record with `expires_at < now` and delete its blob.
    pub async fn sweep_at(&self, now: DateTime<Utc>) -> Result<SweepReport> {
        let repo = StoredFileRepository::new(self.db.pool());
        let purged = repo.delete_expired(now).await?;

        let mut report = SweepReport::default();
        for file in purged {
            match repo.path_in_use(&file.storage_path).await {
                Ok(false) => {}
                Ok(true) => {
                    debug!(id = %file.id, path = %file.storage_path, "Blob still referenced, kept");
                    report.purged.push(file.id);
                    continue;
                }
                Err(e) => {
                    warn!(id = %file.id, error = %e, "Failed to check blob references, kept");
                    report.blob_failures.push(file.id.clone());
                    report.purged.push(file.id);
                    continue;
                }
            }

            match self.storage.delete(Path::new(&file.storage_path)) {
                Ok(true) => {}
                Ok(false) => debug!(id = %file.id, "Blob already absent"),
                Err(e) => {
                    warn!(
                        id = %file.id,
                        path = %file.storage_path,
                        error = %e,
                        "Failed to delete blob of expired file"
                    );
                    report.blob_failures.push(file.id.clone());
                }
            }
            report.purged.push(file.id);
        }

        if report.purged.is_empty() {
            debug!("No expired files to purge");
        } else {
            info!(
                purged_count = report.purged.len(),
                failed_count = report.blob_failures.len(),
                "Purged expired files"
            );
        }

        Ok(report)
    }
}
