//! Shared helpers for the HTTP integration tests.
//!
//! The fake downloader is a shell script run through `sh`: the server is
//! configured with `sh` as its downloader program and the request `url` is
//! the script path, so the script receives `--output <dir> --format <fmt>`
//! exactly like the real downloader would.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use albumdl_axum::bootstrap::{CorsConfig, ServerConfig, bootstrap};
use albumdl_axum::routes::create_router;
use albumdl_core::Settings;

pub const TEST_PORT: u16 = 18_080;

/// Config whose downloads land in `base` and whose cover-art step exits
/// with `cover_art_exit`.
pub fn test_config(base: &Path, cover_art_exit: i32) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: TEST_PORT,
        downloader_program: "sh".to_string(),
        cover_art_program: "sh".to_string(),
        cover_art_args: vec!["-c".to_string(), format!("exit {cover_art_exit}")],
        command_timeout: Duration::from_secs(10),
        max_concurrent_jobs: 3,
        initial_settings: Settings {
            download_path: base.to_path_buf(),
            audio_format: "mp3".to_string(),
        },
        cors: CorsConfig::AllowAll,
    }
}

pub fn test_app(config: &ServerConfig) -> Router {
    let ctx = bootstrap(config).unwrap();
    create_router(ctx, &config.cors)
}

/// Write a fake downloader script and return its path.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

/// Submit a download and return its id.
pub async fn start_download(app: &Router, url: &str, album: &str, kind: Option<&str>) -> String {
    let mut body = serde_json::json!({
        "url": url,
        "artist": "Test Artist",
        "album": album,
    });
    if let Some(kind) = kind {
        body["type"] = Value::from(kind);
    }

    let (status, json) = post_json(app, "/download", &body).await;
    assert_eq!(status, StatusCode::OK, "unexpected response: {json}");
    assert_eq!(json["success"], true);
    json["download_id"].as_str().unwrap().to_string()
}

/// Poll the status endpoint until the job is terminal, asserting that
/// progress never goes backwards while downloading.
pub async fn wait_for_terminal(app: &Router, id: &str) -> Value {
    let uri = format!("/download/status/{id}");
    let mut last_progress = 0;

    for _ in 0..500 {
        let (status, job) = get_json(app, &uri).await;
        assert_eq!(status, StatusCode::OK);

        let progress = job["progress"].as_u64().unwrap();
        assert!(progress <= 100);
        match job["status"].as_str().unwrap() {
            "completed" | "error" => return job,
            "downloading" => {
                assert!(progress >= last_progress, "progress went backwards: {job}");
                last_progress = progress;
            }
            _ => {}
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("job {id} never finished");
}
