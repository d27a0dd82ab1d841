//! Concurrency tests for secureshare.
//!
//! These tests verify that parallel uploads against one database and one
//! storage root each get their own id and record.

use std::collections::HashSet;
use std::sync::Arc;

use secureshare::{BlobStore, Database, FileService, FileStorage, StoredFileRepository};
use tempfile::TempDir;

async fn setup() -> (TempDir, Arc<Database>, Arc<FileStorage>) {
    let temp_dir = TempDir::new().unwrap();
    let storage = Arc::new(FileStorage::new(temp_dir.path()).unwrap());
    storage.ensure_root_exists().unwrap();
    let db = Arc::new(Database::open_in_memory().await.unwrap());
    (temp_dir, db, storage)
}

/// Test concurrent uploads of distinct files.
#[tokio::test]
async fn test_concurrent_uploads() {
    let (_temp_dir, db, storage) = setup().await;

    const NUM_UPLOADS: usize = 20;

    let mut handles = Vec::new();
    for i in 0..NUM_UPLOADS {
        let db = Arc::clone(&db);
        let storage = Arc::clone(&storage);
        handles.push(tokio::spawn(async move {
            let service = FileService::new(&db, &*storage);
            let name = format!("file-{i}.txt");
            let content = format!("content {i}");
            service.store(Some(name.as_str()), content.as_bytes()).await
        }));
    }

    let mut ids = HashSet::new();
    for handle in handles {
        let id = handle.await.unwrap().unwrap();
        ids.insert(id);
    }

    assert_eq!(ids.len(), NUM_UPLOADS);
    assert_eq!(
        StoredFileRepository::new(db.pool()).count().await.unwrap(),
        NUM_UPLOADS as i64
    );

    for i in 0..NUM_UPLOADS {
        let content = std::fs::read(storage.root().join(format!("file-{i}.txt"))).unwrap();
        assert_eq!(content, format!("content {i}").into_bytes());
    }
}

/// Test concurrent expiration updates on the same file.
///
/// Last write wins; every update computes from the same used count, so the
/// final record is consistent with one of the requests.
#[tokio::test]
async fn test_concurrent_updates_same_file() {
    let (_temp_dir, db, storage) = setup().await;
    let id = FileService::new(&db, &*storage)
        .store(Some("shared.txt"), b"shared")
        .await
        .unwrap();

    let mut handles = Vec::new();
    for max in 1..=10 {
        let db = Arc::clone(&db);
        let storage = Arc::clone(&storage);
        let id = id.clone();
        handles.push(tokio::spawn(async move {
            let details = secureshare::ExpirationDetails {
                max_downloads: max,
                expires_in_seconds: 3600,
            };
            FileService::new(&db, &*storage)
                .update_expiration(&id, &details)
                .await
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let record = StoredFileRepository::new(db.pool())
        .get(&id)
        .await
        .unwrap()
        .unwrap();
    assert!((1..=10).contains(&record.max_downloads));
    assert_eq!(record.downloads_remaining, record.max_downloads);
}
