//! Web API File Tests
//!
//! Integration tests for the upload, metadata and expiration endpoints.

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use secureshare::file::id::is_valid_id;
use secureshare::web::create_app;
use secureshare::web::handlers::AppState;
use secureshare::{BlobStore, Database, FileStorage, StoredFileRepository, Sweeper};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

struct TestContext {
    server: TestServer,
    db: Arc<Database>,
    storage: Arc<FileStorage>,
    _temp_dir: TempDir,
}

/// Create a test server with an in-memory database and a temp storage root.
async fn create_test_server() -> TestContext {
    create_test_server_with_limit(10).await
}

async fn create_test_server_with_limit(max_upload_mb: u64) -> TestContext {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let storage = Arc::new(
        FileStorage::new(temp_dir.path().join("uploads")).expect("Failed to create storage"),
    );
    storage
        .ensure_root_exists()
        .expect("Failed to create storage root");

    let db = Arc::new(
        Database::open_in_memory()
            .await
            .expect("Failed to create test database"),
    );

    let app_state = Arc::new(
        AppState::new(db.clone(), storage.clone()).with_max_upload_size_mb(max_upload_mb),
    );
    let router = create_app(app_state, &[]);
    let server = TestServer::new(router).expect("Failed to create test server");

    TestContext {
        server,
        db,
        storage,
        _temp_dir: temp_dir,
    }
}

fn file_form(name: &str, content: &[u8]) -> MultipartForm {
    MultipartForm::new().add_part("file", Part::bytes(content.to_vec()).file_name(name))
}

/// Upload a file and return its id.
async fn upload(server: &TestServer, name: &str, content: &[u8]) -> String {
    let response = server.post("/upload").multipart(file_form(name, content)).await;
    response.assert_status_ok();
    response.json::<Value>()["id"]
        .as_str()
        .expect("id missing")
        .to_string()
}

fn timestamp(value: &Value) -> DateTime<Utc> {
    value
        .as_str()
        .expect("timestamp is not a string")
        .parse()
        .expect("timestamp is not RFC 3339")
}

// ============================================================================
// Upload
// ============================================================================

#[tokio::test]
async fn test_upload_returns_id() {
    let ctx = create_test_server().await;

    let id = upload(&ctx.server, "test.txt", b"Hello World").await;

    assert!(is_valid_id(&id), "unexpected id: {id}");
    assert_eq!(
        std::fs::read(ctx.storage.root().join("test.txt")).unwrap(),
        b"Hello World"
    );
}

#[tokio::test]
async fn test_upload_then_get_metadata() {
    let ctx = create_test_server().await;
    let id = upload(&ctx.server, "test.txt", b"Hello World").await;

    let response = ctx.server.get(&format!("/{id}")).await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["sizeBytes"], 11);
    assert_eq!(body["maxDownloads"], 100);
    assert_eq!(body["downloadsRemaining"], 100);

    let created_at = timestamp(&body["createdAt"]);
    let expires_at = timestamp(&body["expiresAt"]);
    assert!(created_at < expires_at);
    assert_eq!((expires_at - created_at).num_seconds(), 86_400);
}

#[tokio::test]
async fn test_upload_empty_file() {
    let ctx = create_test_server().await;

    let response = ctx.server.post("/upload").multipart(file_form("empty.txt", b"")).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({"error": "Failed to store empty file."}));
}

#[tokio::test]
async fn test_upload_path_traversal() {
    let ctx = create_test_server().await;

    let response = ctx
        .server
        .post("/upload")
        .multipart(file_form("../testMaliciousDir", b"evil"))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["error"].is_string());
    assert!(!ctx._temp_dir.path().join("testMaliciousDir").exists());
}

#[tokio::test]
async fn test_upload_missing_file_part() {
    let ctx = create_test_server().await;

    let form = MultipartForm::new().add_text("description", "no file here");
    let response = ctx.server.post("/upload").multipart(form).await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_upload_too_large() {
    let ctx = create_test_server_with_limit(1).await;

    let content = vec![0xAB; 1024 * 1024 + 10];
    let response = ctx
        .server
        .post("/upload")
        .multipart(file_form("big.bin", &content))
        .await;

    response.assert_status_bad_request();
    assert!(!ctx.storage.root().join("big.bin").exists());
}

// ============================================================================
// Metadata
// ============================================================================

#[tokio::test]
async fn test_get_unknown_id() {
    let ctx = create_test_server().await;

    let response = ctx.server.get("/unknown").await;

    response.assert_status_not_found();
    response.assert_json(&json!({"error": "Failed to get metadata for file: unknown"}));
}

// ============================================================================
// Expiration update
// ============================================================================

#[tokio::test]
async fn test_update_expiration() {
    let ctx = create_test_server().await;
    let id = upload(&ctx.server, "test.txt", b"content").await;

    let response = ctx
        .server
        .put(&format!("/{id}"))
        .json(&json!({"maxDownloads": 67, "expiresInSeconds": 241200}))
        .await;
    response.assert_status_ok();

    let updated: Value = response.json();
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["maxDownloads"], 67);
    assert_eq!(updated["downloadsRemaining"], 67);
    assert_eq!(
        (timestamp(&updated["expiresAt"]) - timestamp(&updated["createdAt"])).num_seconds(),
        241_200
    );

    let body: Value = ctx.server.get(&format!("/{id}")).await.json();
    assert_eq!(body, updated);

    let created_at = timestamp(&body["createdAt"]);
    let expires_at = timestamp(&body["expiresAt"]);
    assert_eq!((expires_at - created_at).num_seconds(), 241_200);
}

#[tokio::test]
async fn test_update_expiration_unknown_id() {
    let ctx = create_test_server().await;
    let id = upload(&ctx.server, "test.txt", b"content").await;
    let before: Value = ctx.server.get(&format!("/{id}")).await.json();

    let response = ctx
        .server
        .put("/unknown")
        .json(&json!({"maxDownloads": 1, "expiresInSeconds": 60}))
        .await;

    response.assert_status_not_found();
    response.assert_json(&json!({"error": "Failed to fetch file: unknown"}));

    let repo = StoredFileRepository::new(ctx.db.pool());
    assert_eq!(repo.count().await.unwrap(), 1);
    assert!(!repo.exists("unknown").await.unwrap());

    let after: Value = ctx.server.get(&format!("/{id}")).await.json();
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_update_expiration_missing_field() {
    let ctx = create_test_server().await;
    let id = upload(&ctx.server, "test.txt", b"content").await;

    let response = ctx
        .server
        .put(&format!("/{id}"))
        .json(&json!({"maxDownloads": 5}))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON"));
}

#[tokio::test]
async fn test_update_expiration_out_of_range() {
    let ctx = create_test_server().await;
    let id = upload(&ctx.server, "test.txt", b"content").await;

    let response = ctx
        .server
        .put(&format!("/{id}"))
        .json(&json!({"maxDownloads": 5, "expiresInSeconds": i64::MAX}))
        .await;

    response.assert_status_bad_request();
}

// ============================================================================
// Sweeping
// ============================================================================

#[tokio::test]
async fn test_expired_upload_is_swept() {
    let ctx = create_test_server().await;
    let id = upload(&ctx.server, "short-lived.txt", b"bye").await;

    ctx.server
        .put(&format!("/{id}"))
        .json(&json!({"maxDownloads": 100, "expiresInSeconds": -60}))
        .await
        .assert_status_ok();

    let sweeper = Sweeper::new(ctx.db.clone(), ctx.storage.clone());
    let report = sweeper.sweep().await.unwrap();
    assert_eq!(report.purged, vec![id.clone()]);

    ctx.server
        .get(&format!("/{id}"))
        .await
        .assert_status_not_found();
    assert!(!ctx.storage.root().join("short-lived.txt").exists());
}

#[tokio::test]
async fn test_health_check() {
    let ctx = create_test_server().await;

    let response = ctx.server.get("/health").await;

    response.assert_status_ok();
    response.assert_text("OK");
}
