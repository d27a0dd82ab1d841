//! File management module for secureshare.
//!
//! This module provides the stored file lifecycle:
//! - Path-guarded blob storage under a single root
//! - Short random file ids
//! - Metadata with expiry time and download allowance
//! - Periodic purge of expired files

pub mod expiration;
pub mod id;
mod metadata;
pub mod path_guard;
mod service;
mod storage;
mod sweeper;

pub use expiration::{ExpirationDetails, Lifecycle, DEFAULT_MAX_DOWNLOADS, DEFAULT_TTL_SECS};
pub use metadata::{PurgedFile, StoredFile, StoredFileRepository};
pub use service::FileService;
pub use storage::{BlobStore, FileStorage};
pub use sweeper::{SweepReport, Sweeper, DEFAULT_SWEEP_INTERVAL_SECS};

/// Default maximum upload size (10MB).
pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 10 * 1024 * 1024;
