//! API handlers for the secureshare HTTP layer.

pub mod file;

pub use file::*;

use std::sync::Arc;

use crate::db::Database;
use crate::file::{BlobStore, DEFAULT_MAX_UPLOAD_SIZE};

/// Shared state for API handlers.
#[derive(Clone)]
pub struct AppState {
    /// Metadata database.
    pub db: Arc<Database>,
    /// Blob storage.
    pub storage: Arc<dyn BlobStore>,
    /// Maximum upload size in bytes.
    pub max_upload_size: u64,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Arc<Database>, storage: Arc<dyn BlobStore>) -> Self {
        Self {
            db,
            storage,
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
        }
    }

    /// Set the maximum upload size in bytes.
    pub fn with_max_upload_size(mut self, bytes: u64) -> Self {
        self.max_upload_size = bytes;
        self
    }

    /// Set the maximum upload size in megabytes. Saturates at `u64::MAX`.
    pub fn with_max_upload_size_mb(self, mb: u64) -> Self {
        self.with_max_upload_size(mb.saturating_mul(1024 * 1024))
    }
}
