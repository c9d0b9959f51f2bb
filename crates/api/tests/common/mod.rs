#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use office_db::MemoryStore;
use office_pipeline::{ImageRenderer, LocalImageSink, QrEncoder, QrImageRenderer};
use tempfile::TempDir;
use tower::ServiceExt;

use office_api::config::{QrConfig, ServerConfig};
use office_api::router::build_app_router;
use office_api::state::AppState;

/// Router over a fresh in-memory store plus the temp dir images land in.
///
/// Keep the `TestApp` alive for the whole test: dropping it deletes the
/// image directory.
pub struct TestApp {
    pub router: Router,
    pub images: TempDir,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(image_dir: &std::path::Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        database_url: None,
        qr: QrConfig {
            image_dir: image_dir.to_path_buf(),
            render_concurrency: 4,
            ..QrConfig::default()
        },
    }
}

/// Full application with the real QR renderer writing into a temp dir.
pub fn build_test_app() -> TestApp {
    let images = tempfile::tempdir().unwrap();
    let renderer = Arc::new(QrImageRenderer::new(
        QrEncoder::default(),
        Arc::new(LocalImageSink::new(images.path())),
    ));
    build_test_app_with_renderer(images, renderer)
}

/// Full application with a caller-supplied renderer.
pub fn build_test_app_with_renderer(
    images: TempDir,
    renderer: Arc<dyn ImageRenderer>,
) -> TestApp {
    build_test_app_with(images, renderer, |_| {})
}

/// Full application with a caller-supplied renderer and config overrides.
pub fn build_test_app_with(
    images: TempDir,
    renderer: Arc<dyn ImageRenderer>,
    configure: impl FnOnce(&mut ServerConfig),
) -> TestApp {
    let mut config = test_config(images.path());
    configure(&mut config);

    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(config, store.clone(), store, renderer, None);
    TestApp {
        router: build_app_router(state),
        images,
    }
}

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(json)).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri, None).await
}

pub async fn put_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(json)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
