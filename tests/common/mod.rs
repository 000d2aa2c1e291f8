#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use axum_extra::extract::cookie::Key;
use bank_registry::{BankStorage, ConnectionManager, RegistryState, config::DatabaseConfig};
use tempfile::TempDir;
use tower::ServiceExt;

/// Router backed by a fresh database file; keep the `TempDir` alive for the test.
pub async fn app() -> (TempDir, BankStorage, Router) {
    let dir = TempDir::new().expect("tempdir");
    let cfg = DatabaseConfig {
        url: format!("sqlite:{}", dir.path().join("banks.sqlite").display()),
        create_if_missing: true,
    };
    let storage = BankStorage::new(ConnectionManager::new(&cfg).expect("manager"));
    storage.init_schema().await.expect("schema");
    let state = RegistryState::new(storage.clone(), Key::generate(), true);
    (dir, storage, bank_registry::registry_router(state))
}

pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.expect("request failed")
}

pub async fn body_text(resp: Response<Body>) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(bytes.to_vec()).expect("response body was not utf-8")
}

pub async fn body_json(resp: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body was not json")
}

/// Delete the database file behind a running app. The next connection recreates an
/// empty file without the `banks` table, so every query fails.
pub fn break_store(dir: &TempDir) {
    for name in ["banks.sqlite", "banks.sqlite-wal", "banks.sqlite-shm"] {
        let _ = std::fs::remove_file(dir.path().join(name));
    }
}
