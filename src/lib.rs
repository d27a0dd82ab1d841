//! secureshare - self-expiring file sharing backend.
//!
//! Upload a file, get a short id back, then look up or tune its
//! expiry and download allowance. Expired files are purged by a
//! background sweeper.

pub mod config;
pub mod db;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use config::Config;
pub use db::Database;
pub use error::{Result, ShareError};
pub use file::{
    BlobStore, ExpirationDetails, FileService, FileStorage, StoredFile, StoredFileRepository,
    Sweeper,
};
pub use web::WebServer;
