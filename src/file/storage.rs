//! Blob storage for secureshare.
//!
//! Uploaded bytes live as flat files directly under one root directory,
//! named after the (guarded) upload filename:
//! ```text
//! {root}/
//! ├── report.pdf
//! ├── photo.png
//! └── ...
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{error, info};

use super::path_guard;
use crate::{Result, ShareError};

/// Storage backend for raw file bytes.
pub trait BlobStore: Send + Sync {
    /// Absolute root directory of the store.
    fn root(&self) -> &Path;

    /// Create the root directory if needed. Idempotent.
    fn ensure_root_exists(&self) -> Result<()>;

    /// Write `content` to `dest`, replacing any existing file.
    fn write(&self, dest: &Path, content: &[u8]) -> Result<()>;

    /// Delete the blob at `path`.
    ///
    /// Returns `true` if the file was deleted, `false` if it didn't exist.
    fn delete(&self, path: &Path) -> Result<bool>;

    /// Read a blob back by file id.
    fn read(&self, _id: &str) -> Result<Vec<u8>> {
        Err(ShareError::Unimplemented("blob read"))
    }
}

/// Filesystem-backed [`BlobStore`].
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `location`.
    ///
    /// The location is made absolute but not created; call
    /// [`BlobStore::ensure_root_exists`] before the first write.
    pub fn new(location: impl AsRef<Path>) -> Result<Self> {
        let location = location.as_ref();
        if location.to_string_lossy().trim().is_empty() {
            return Err(ShareError::Storage(
                "File upload location can not be empty.".to_string(),
            ));
        }

        Ok(Self {
            root: path_guard::absolute_root(location)?,
        })
    }

    fn write_atomic(&self, dest: &Path, content: &[u8]) -> io::Result<()> {
        let dir = dest.parent().unwrap_or(&self.root);
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content)?;
        tmp.as_file().sync_all()?;
        tmp.persist(dest).map_err(|e| e.error)?;
        Ok(())
    }
}

impl BlobStore for FileStorage {
    fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_root_exists(&self) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| {
            error!("Could not initialize storage at {:?}: {}", self.root, e);
            ShareError::Storage("Could not initialize storage".to_string())
        })?;
        info!("Storage root ready at {:?}", self.root);
        Ok(())
    }

    fn write(&self, dest: &Path, content: &[u8]) -> Result<()> {
        self.write_atomic(dest, content).map_err(|e| {
            error!("Failed to write {:?}: {}", dest, e);
            ShareError::Storage("Failed to store file.".to_string())
        })
    }

    fn delete(&self, path: &Path) -> Result<bool> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
