//! Expiration policy for stored files.
//!
//! Pure functions over [`StoredFile`]: the default lifecycle assigned at
//! upload time and the rule for changing it afterwards.

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};

use crate::{Result, ShareError};

use super::metadata::StoredFile;

/// Time to live assigned to a fresh upload (one day).
pub const DEFAULT_TTL_SECS: i64 = 86_400;

/// Download allowance assigned to a fresh upload.
pub const DEFAULT_MAX_DOWNLOADS: i32 = 100;

/// Requested change to a file's expiration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirationDetails {
    /// New total download allowance.
    pub max_downloads: i32,
    /// New lifetime, measured from the file's creation time.
    pub expires_in_seconds: i64,
}

/// Timestamps and counters of a stored file's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifecycle {
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub max_downloads: i32,
    pub downloads_remaining: i32,
}

/// Lifecycle of a file uploaded at `now`.
pub fn initial_policy(now: DateTime<Utc>) -> Lifecycle {
    let created_at = now.trunc_subsecs(0);
    Lifecycle {
        created_at,
        expires_at: created_at + TimeDelta::seconds(DEFAULT_TTL_SECS),
        max_downloads: DEFAULT_MAX_DOWNLOADS,
        downloads_remaining: DEFAULT_MAX_DOWNLOADS,
    }
}

/// Downloads already consumed from the allowance.
pub fn used_downloads(file: &StoredFile) -> i32 {
    file.max_downloads.saturating_sub(file.downloads_remaining)
}

/// Apply an expiration change to `existing`.
///
/// The expiry is recomputed from `created_at`, not from now. Consumed
/// downloads carry over, so `downloads_remaining` may go negative when the
/// new allowance is below what was already used.
pub fn apply_update(existing: &StoredFile, details: &ExpirationDetails) -> Result<StoredFile> {
    let expires_at = TimeDelta::try_seconds(details.expires_in_seconds)
        .and_then(|ttl| existing.created_at.checked_add_signed(ttl))
        .ok_or_else(|| {
            ShareError::Validation(format!(
                "expiresInSeconds out of range: {}",
                details.expires_in_seconds
            ))
        })?;

    Ok(StoredFile {
        expires_at,
        max_downloads: details.max_downloads,
        downloads_remaining: details.max_downloads.saturating_sub(used_downloads(existing)),
        ..existing.clone()
    })
}

/// Whether the file is past its expiry at `now`.
pub fn is_expired(file: &StoredFile, now: DateTime<Utc>) -> bool {
    file.expires_at < now
}
