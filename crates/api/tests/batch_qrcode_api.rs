//! HTTP-level integration tests for the batch QR code endpoints.

mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::{body_json, delete, get, post_empty, post_json, put_json};
use office_db::models::qr_code::QrCode;
use office_pipeline::{ImageRenderer, RenderError};
use serde_json::{json, Value};

fn batch_body(count: i64, prefix: &str, name: &str, url_template: &str) -> Value {
    json!({
        "app_id": "app_1",
        "name": name,
        "prefix": prefix,
        "count": count,
        "type": "static",
        "url_template": url_template,
        "created_by": "user_1",
    })
}

async fn create_batch(app: &common::TestApp, body: Value) -> Value {
    let response = post_json(app.app(), "/api/v1/batch-qrcodes", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_batch_returns_201_pending() {
    let app = common::build_test_app();
    let batch = create_batch(&app, batch_body(3, "t", "Batch", "")).await;

    assert!(batch["id"].as_str().unwrap().starts_with("batch_"));
    assert_eq!(batch["status"], "pending");
    assert_eq!(batch["type"], "static");
    assert_eq!(batch["count"], 3);
    assert_eq!(batch["description"], "");
}

#[tokio::test]
async fn create_batch_rejects_count_out_of_range() {
    let app = common::build_test_app();

    for count in [0, 10001] {
        let response = post_json(
            app.app(),
            "/api/v1/batch-qrcodes",
            batch_body(count, "", "Batch", ""),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }

    let response = get(app.app(), "/api/v1/batch-qrcodes?app_id=app_1").await;
    assert_eq!(body_json(response).await["data"]["total"], 0);
}

#[tokio::test]
async fn create_batch_rejects_unknown_type() {
    let app = common::build_test_app();
    let mut body = batch_body(3, "", "Batch", "");
    body["type"] = json!("animated");

    let response = post_json(app.app(), "/api/v1/batch-qrcodes", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Get / update / delete / list
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_unknown_batch_returns_404() {
    let app = common::build_test_app();
    let response = get(app.app(), "/api/v1/batch-qrcodes/batch_missing").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn update_batch_changes_descriptive_fields_only() {
    let app = common::build_test_app();
    let batch = create_batch(&app, batch_body(3, "t", "Batch", "")).await;
    let id = batch["id"].as_str().unwrap();

    let response = put_json(
        app.app(),
        &format!("/api/v1/batch-qrcodes/{id}"),
        json!({"name": "Renamed", "prefix": "", "count": 50, "status": "completed"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["name"], "Renamed");
    assert_eq!(updated["prefix"], "t");
    assert_eq!(updated["count"], 3);
    assert_eq!(updated["status"], "pending");
}

#[tokio::test]
async fn update_unknown_batch_returns_404() {
    let app = common::build_test_app();
    let response = put_json(
        app.app(),
        "/api/v1/batch-qrcodes/batch_missing",
        json!({"name": "x"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_batch_returns_204_then_404() {
    let app = common::build_test_app();
    let batch = create_batch(&app, batch_body(3, "", "Batch", "")).await;
    let uri = format!("/api/v1/batch-qrcodes/{}", batch["id"].as_str().unwrap());

    assert_eq!(delete(app.app(), &uri).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(delete(app.app(), &uri).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(app.app(), &uri).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_batches_requires_app_id() {
    let app = common::build_test_app();
    let response = get(app.app(), "/api/v1/batch-qrcodes").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_batches_pages_newest_first() {
    let app = common::build_test_app();
    let mut ids = Vec::new();
    for i in 0..3 {
        let batch = create_batch(&app, batch_body(1, "", &format!("B{i}"), "")).await;
        ids.push(batch["id"].as_str().unwrap().to_string());
    }

    let response = get(
        app.app(),
        "/api/v1/batch-qrcodes?app_id=app_1&page=1&size=2",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await["data"].clone();
    assert_eq!(page["total"], 3);
    assert_eq!(page["page"], 1);
    assert_eq!(page["size"], 2);
    let listed: Vec<&str> = page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap())
        .collect();
    assert_eq!(listed, vec![ids[2].as_str(), ids[1].as_str()]);

    let response = get(
        app.app(),
        "/api/v1/batch-qrcodes?app_id=app_1&page=0&size=500",
    )
    .await;
    let page = body_json(response).await["data"].clone();
    assert_eq!(page["page"], 1);
    assert_eq!(page["size"], 10);
    assert_eq!(page["items"].as_array().unwrap().len(), 3);
}

// ---------------------------------------------------------------------------
// Generate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generate_returns_items_and_completes_batch() {
    let app = common::build_test_app();
    let batch = create_batch(&app, batch_body(3, "t", "Batch", "")).await;
    let id = batch["id"].as_str().unwrap();

    let response = post_empty(app.app(), &format!("/api/v1/batch-qrcodes/{id}/generate")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let items = body_json(response).await["data"].clone();
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 3);
    for (i, item) in items.iter().enumerate() {
        let index = i + 1;
        assert_eq!(item["name"], format!("t_Batch_{index}"));
        assert_eq!(item["type"], "static");
        assert_eq!(item["batch_id"], id);
        assert_eq!(item["batch_index"], index);
        let content = item["content"].as_str().unwrap();
        assert!(content.contains(id));
        assert!(content.ends_with(&format!("/{index}")));
        assert_eq!(item["url"], item["content"]);
        let image_path = item["image_path"].as_str().unwrap();
        assert!(std::path::Path::new(image_path).exists());
    }

    let response = get(app.app(), &format!("/api/v1/batch-qrcodes/{id}")).await;
    assert_eq!(body_json(response).await["data"]["status"], "completed");
}

#[tokio::test]
async fn generate_twice_returns_409() {
    let app = common::build_test_app();
    let batch = create_batch(&app, batch_body(2, "", "Batch", "https://x.test/{index}")).await;
    let uri = format!(
        "/api/v1/batch-qrcodes/{}/generate",
        batch["id"].as_str().unwrap()
    );

    assert_eq!(post_empty(app.app(), &uri).await.status(), StatusCode::OK);

    let response = post_empty(app.app(), &uri).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[tokio::test]
async fn generate_unknown_batch_returns_404() {
    let app = common::build_test_app();
    let response = post_empty(app.app(), "/api/v1/batch-qrcodes/batch_missing/generate").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn batch_items_are_listed_in_index_order() {
    let app = common::build_test_app();
    let batch = create_batch(&app, batch_body(4, "", "Event", "https://x.test/{index}")).await;
    let id = batch["id"].as_str().unwrap();

    let items_uri = format!("/api/v1/batch-qrcodes/{id}/items");
    let before = body_json(get(app.app(), &items_uri).await).await;
    assert_eq!(before["data"].as_array().unwrap().len(), 0);

    post_empty(app.app(), &format!("/api/v1/batch-qrcodes/{id}/generate")).await;

    let first = body_json(get(app.app(), &items_uri).await).await;
    let second = body_json(get(app.app(), &items_uri).await).await;
    assert_eq!(first, second);

    let contents: Vec<&str> = first["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["content"].as_str().unwrap())
        .collect();
    assert_eq!(
        contents,
        vec![
            "https://x.test/1",
            "https://x.test/2",
            "https://x.test/3",
            "https://x.test/4"
        ]
    );
}

struct RejectingRenderer;

#[async_trait]
impl ImageRenderer for RejectingRenderer {
    async fn render(&self, qr_code: &QrCode) -> Result<String, RenderError> {
        if qr_code.batch_index == Some(2) {
            return Err(RenderError::Encode("rejected".to_string()));
        }
        Ok(format!("/images/{}.png", qr_code.id))
    }
}

#[tokio::test]
async fn render_failure_still_completes_batch() {
    let images = tempfile::tempdir().unwrap();
    let app = common::build_test_app_with_renderer(images, Arc::new(RejectingRenderer));
    let batch = create_batch(&app, batch_body(3, "", "Event", "")).await;
    let id = batch["id"].as_str().unwrap();

    let response = post_empty(app.app(), &format!("/api/v1/batch-qrcodes/{id}/generate")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let items = body_json(response).await["data"].clone();
    let paths: Vec<&str> = items
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["image_path"].as_str().unwrap())
        .collect();
    assert!(!paths[0].is_empty());
    assert!(paths[1].is_empty());
    assert!(!paths[2].is_empty());

    let response = get(app.app(), &format!("/api/v1/batch-qrcodes/{id}")).await;
    assert_eq!(body_json(response).await["data"]["status"], "completed");
}

/// Takes `delay` per image.
struct SlowRenderer {
    delay: Duration,
}

#[async_trait]
impl ImageRenderer for SlowRenderer {
    async fn render(&self, qr_code: &QrCode) -> Result<String, RenderError> {
        tokio::time::sleep(self.delay).await;
        Ok(format!("/images/{}.png", qr_code.id))
    }
}

#[tokio::test]
async fn generation_outlives_request_timeout() {
    let images = tempfile::tempdir().unwrap();
    let renderer = Arc::new(SlowRenderer {
        delay: Duration::from_millis(600),
    });
    let app = common::build_test_app_with(images, renderer, |config| {
        config.request_timeout_secs = 1;
        config.qr.render_concurrency = 1;
    });
    let batch = create_batch(&app, batch_body(5, "", "Event", "")).await;
    let id = batch["id"].as_str().unwrap();

    let response = post_empty(app.app(), &format!("/api/v1/batch-qrcodes/{id}/generate")).await;
    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);

    let mut status = Value::Null;
    for _ in 0..50 {
        let response = get(app.app(), &format!("/api/v1/batch-qrcodes/{id}")).await;
        status = body_json(response).await["data"]["status"].clone();
        if status == "completed" {
            break;
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    assert_eq!(status, "completed");

    let items = body_json(get(app.app(), &format!("/api/v1/batch-qrcodes/{id}/items")).await).await;
    let items = items["data"].as_array().unwrap();
    assert_eq!(items.len(), 5);
    assert!(items
        .iter()
        .all(|q| !q["image_path"].as_str().unwrap().is_empty()));

    let retry = post_empty(app.app(), &format!("/api/v1/batch-qrcodes/{id}/generate")).await;
    assert_eq!(retry.status(), StatusCode::CONFLICT);
}
