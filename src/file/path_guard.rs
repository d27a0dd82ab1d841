//! Path safety checks for uploaded filenames.
//!
//! A candidate name is joined onto the storage root and normalized
//! lexically (the file does not have to exist yet). The result is accepted
//! only when its parent directory is exactly the normalized root: no
//! subdirectories, no `..` segments, no absolute overrides.

use std::path::{Component, Path, PathBuf};

use crate::{Result, ShareError};

/// Resolve `name` against `root`, returning the absolute destination path.
///
/// Fails with [`ShareError::InvalidPath`] when the name is absent or empty,
/// contains NUL bytes or a `..` segment, or resolves anywhere other than
/// directly inside `root`.
pub fn resolve(root: &Path, name: Option<&str>) -> Result<PathBuf> {
    let name = name.ok_or_else(|| {
        ShareError::InvalidPath("Failed to store file with null file name".to_string())
    })?;

    if name.trim().is_empty() {
        return Err(ShareError::InvalidPath(
            "Failed to store file with empty file name".to_string(),
        ));
    }

    if name.contains('\0') {
        return Err(ShareError::InvalidPath(
            "File name contains null bytes".to_string(),
        ));
    }

    let candidate = Path::new(name);
    if candidate
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(outside_root());
    }

    let root = absolute_root(root)?;
    let destination = normalize(&root.join(candidate));

    match destination.parent() {
        Some(parent) if parent == root => Ok(destination),
        _ => Err(outside_root()),
    }
}

/// Make `root` absolute (against the working directory) and normalize it.
pub fn absolute_root(root: &Path) -> Result<PathBuf> {
    let absolute = if root.is_absolute() {
        root.to_path_buf()
    } else {
        std::env::current_dir()?.join(root)
    };
    Ok(normalize(&absolute))
}

/// Lexically normalize a path: drop `.` segments and fold `..` into the parent.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn outside_root() -> ShareError {
    ShareError::InvalidPath("Cannot store file outside current directory".to_string())
}
