// =====================================================
// 통합 테스트 공통 헬퍼
// Shared helpers for the gateway integration tests
// =====================================================
// Sets up a throwaway uploads tree and builds the real router against it.
// All configuration is constructed directly (no environment variables), so
// tests can run in parallel and key rotation is exercised by building two
// differently-keyed states.
// =====================================================

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use media_server::domains::media::models::MediaFolder;
use media_server::domains::media::services::MediaState;
use media_server::routes::create_router;
use media_server::shared::config::{MediaCacheConfig, MediaConfig};
use media_server::shared::services::AppState;

pub const KEY0: &[u8] = b"integration-test-signing-key-zero";
pub const KEY1: &[u8] = b"integration-test-signing-key-one";

pub fn signing_keys() -> HashMap<String, Vec<u8>> {
    HashMap::from([
        ("0".to_string(), KEY0.to_vec()),
        ("1".to_string(), KEY1.to_vec()),
    ])
}

/// Default gateway config: every folder token-protected.
pub fn media_config(uploads_dir: PathBuf) -> MediaConfig {
    MediaConfig {
        uploads_dir,
        issuer: "origin-sign.test".to_string(),
        current_key_id: "0".to_string(),
        signing_keys: signing_keys(),
        protected_folders: MediaFolder::ALL.into_iter().collect(),
        cache: MediaCacheConfig::default(),
    }
}

/// Same config with some folders opened up for public serving.
pub fn media_config_with_public(uploads_dir: PathBuf, public: &[MediaFolder]) -> MediaConfig {
    let mut config = media_config(uploads_dir);
    for folder in public {
        config.protected_folders.remove(folder);
    }
    config
}

pub fn media_state(config: &MediaConfig) -> MediaState {
    MediaState::new(config).expect("failed to build media state")
}

pub fn router(config: &MediaConfig) -> Router {
    let app_state = AppState {
        media_state: media_state(config),
    };
    create_router().with_state(app_state)
}

/// 1000 deterministic bytes, so range assertions can compare exact content.
pub fn clip_bytes() -> Vec<u8> {
    (0u32..1000).map(|i| (i % 251) as u8).collect()
}

/// Create the uploads tree: one file per folder plus decoys (an unsupported
/// extension inside a served folder, and a file outside every folder).
pub fn setup_uploads() -> TempDir {
    let dir = tempfile::tempdir().expect("failed to create temp uploads dir");
    for folder in ["images", "thumbnails", "videos"] {
        std::fs::create_dir_all(dir.path().join(folder)).unwrap();
    }
    std::fs::write(dir.path().join("images/cat.jpg"), b"\xff\xd8\xff\xe0fake-jpeg").unwrap();
    std::fs::write(dir.path().join("thumbnails/cat-thumb.png"), b"\x89PNGfake").unwrap();
    std::fs::write(dir.path().join("videos/clip.mp4"), clip_bytes()).unwrap();
    // exists on disk but must never be served
    std::fs::write(dir.path().join("images/script.php"), b"<?php echo 1;").unwrap();
    // traversal target one level above the folder whitelist
    std::fs::write(dir.path().join("secret.txt"), b"top secret").unwrap();
    dir
}

pub async fn get(router: &Router, uri: &str) -> Response {
    router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn get_with_header(router: &Router, uri: &str, name: &str, value: &str) -> Response {
    router
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header(name, value)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub fn header_value(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
