//! Database schema and migrations for secureshare.
//!
//! Migrations are applied sequentially when the database is first opened
//! or upgraded.

/// Database migrations.
///
/// Each migration is a SQL script that will be executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: Stored file metadata
    r#"
-- One row per uploaded blob. Timestamps are unix seconds (UTC).
CREATE TABLE stored_files (
    id                  TEXT PRIMARY KEY NOT NULL,
    storage_path        TEXT NOT NULL,
    size_bytes          INTEGER NOT NULL,
    created_at          INTEGER NOT NULL,
    expires_at          INTEGER NOT NULL,
    max_downloads       INTEGER NOT NULL,
    downloads_remaining INTEGER NOT NULL
);

CREATE INDEX idx_stored_files_expires_at ON stored_files(expires_at);
"#,
];
