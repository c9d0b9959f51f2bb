//! Batch definition management: create, update, delete, get, list.
//!
//! Creation validates kind and count before anything is persisted. Updates
//! only touch descriptive fields; `count`, `type`, and `status` are fixed.

use std::collections::HashMap;
use std::sync::Arc;

use office_core::error::CoreError;
use office_core::ids::generate_batch_id;
use office_core::pagination::{Page, PageRequest};
use office_core::qr_batch::{self, BatchKind, STATUS_PENDING};
use office_db::models::batch_qr_code::{BatchQrCode, CreateBatchQrCode, UpdateBatchQrCode};
use office_db::models::qr_code::QrCode;
use office_db::{BatchStore, ItemStore};
use serde::Deserialize;

use crate::{non_empty, store_failure};

/// Request to create a batch definition.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBatchQrCodeRequest {
    pub app_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub prefix: Option<String>,
    pub count: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub url_template: Option<String>,
    #[serde(default)]
    pub config: Option<HashMap<String, String>>,
    pub created_by: String,
}

/// Request to update a batch definition. Absent or empty fields are left
/// unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBatchQrCodeRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub prefix: Option<String>,
    pub url_template: Option<String>,
    pub config: Option<HashMap<String, String>>,
}

pub struct BatchQrCodeService {
    batches: Arc<dyn BatchStore>,
    items: Arc<dyn ItemStore>,
}

impl BatchQrCodeService {
    pub fn new(batches: Arc<dyn BatchStore>, items: Arc<dyn ItemStore>) -> Self {
        Self { batches, items }
    }

    /// Validate and persist a new batch in `pending` status.
    pub async fn create(&self, req: CreateBatchQrCodeRequest) -> Result<BatchQrCode, CoreError> {
        let kind = BatchKind::from_str_value(&req.kind)?;
        let count = qr_batch::validate_count(req.count)?;
        qr_batch::validate_required("app_id", &req.app_id)?;
        qr_batch::validate_required("name", &req.name)?;
        qr_batch::validate_required("created_by", &req.created_by)?;

        let input = CreateBatchQrCode {
            id: generate_batch_id(),
            app_id: req.app_id,
            name: req.name,
            description: req.description.unwrap_or_default(),
            prefix: req.prefix.unwrap_or_default(),
            count,
            kind: kind.as_str().to_string(),
            url_template: req.url_template.unwrap_or_default(),
            config: config_value(req.config.unwrap_or_default())?,
            status: STATUS_PENDING.to_string(),
            created_by: req.created_by,
        };

        let batch = self
            .batches
            .create_batch(&input)
            .await
            .map_err(store_failure("create batch QR code"))?;

        tracing::info!(
            batch_id = %batch.id,
            app_id = %batch.app_id,
            count = batch.count,
            kind = %batch.kind,
            "Batch QR code created"
        );
        Ok(batch)
    }

    /// Update descriptive fields of an existing batch.
    pub async fn update(
        &self,
        id: &str,
        req: UpdateBatchQrCodeRequest,
    ) -> Result<BatchQrCode, CoreError> {
        let input = UpdateBatchQrCode {
            name: non_empty(req.name),
            description: non_empty(req.description),
            prefix: non_empty(req.prefix),
            url_template: non_empty(req.url_template),
            config: req
                .config
                .filter(|c| !c.is_empty())
                .map(config_value)
                .transpose()?,
        };

        self.batches
            .update_batch(id, &input)
            .await
            .map_err(store_failure("update batch QR code"))?
            .ok_or_else(|| not_found(id))
    }

    pub async fn delete(&self, id: &str) -> Result<(), CoreError> {
        let deleted = self
            .batches
            .delete_batch(id)
            .await
            .map_err(store_failure("delete batch QR code"))?;
        if !deleted {
            return Err(not_found(id));
        }
        tracing::info!(batch_id = id, "Batch QR code deleted");
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<BatchQrCode, CoreError> {
        self.batches
            .find_batch(id)
            .await
            .map_err(store_failure("get batch QR code"))?
            .ok_or_else(|| not_found(id))
    }

    /// One page of an application's batches, newest first.
    pub async fn list(
        &self,
        app_id: &str,
        page: Option<i64>,
        size: Option<i64>,
    ) -> Result<Page<BatchQrCode>, CoreError> {
        qr_batch::validate_required("app_id", app_id)?;
        let request = PageRequest::normalize(page, size);
        let (rows, total) = self
            .batches
            .list_batches(app_id, request.limit(), request.offset())
            .await
            .map_err(store_failure("list batch QR codes"))?;
        Ok(Page::new(rows, total, request))
    }

    /// Items generated for a batch, in index order.
    pub async fn items(&self, id: &str) -> Result<Vec<QrCode>, CoreError> {
        self.get(id).await?;
        self.items
            .list_batch_items(id)
            .await
            .map_err(store_failure("list batch QR code items"))
    }
}

fn not_found(id: &str) -> CoreError {
    CoreError::NotFound {
        entity: "BatchQrCode",
        id: id.to_string(),
    }
}

fn config_value(config: HashMap<String, String>) -> Result<serde_json::Value, CoreError> {
    serde_json::to_value(config).map_err(|e| CoreError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use office_db::MemoryStore;

    use super::*;

    fn service() -> BatchQrCodeService {
        let store = Arc::new(MemoryStore::new());
        BatchQrCodeService::new(store.clone(), store)
    }

    fn request(count: i64, kind: &str) -> CreateBatchQrCodeRequest {
        CreateBatchQrCodeRequest {
            app_id: "app_1".to_string(),
            name: "Event".to_string(),
            description: None,
            prefix: Some("ticket".to_string()),
            count,
            kind: kind.to_string(),
            url_template: None,
            config: None,
            created_by: "user_1".to_string(),
        }
    }

    #[tokio::test]
    async fn create_persists_pending_batch() {
        let svc = service();
        let batch = svc.create(request(3, "static")).await.unwrap();
        assert_eq!(batch.status, "pending");
        assert_eq!(batch.count, 3);
        assert_eq!(batch.kind, "static");
        assert!(batch.id.starts_with("batch_"));
        assert_eq!(batch.config, serde_json::json!({}));

        assert_eq!(svc.get(&batch.id).await.unwrap(), batch);
    }

    #[tokio::test]
    async fn create_rejects_count_out_of_bounds_without_persisting() {
        let svc = service();
        for count in [-5, 0, 10_001] {
            assert_matches!(
                svc.create(request(count, "static")).await,
                Err(CoreError::Validation(_))
            );
        }
        assert_eq!(svc.list("app_1", None, None).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn create_rejects_unknown_kind() {
        let svc = service();
        for kind in ["", "animated", "Static"] {
            assert_matches!(
                svc.create(request(1, kind)).await,
                Err(CoreError::Validation(_))
            );
        }
    }

    #[tokio::test]
    async fn update_touches_only_descriptive_fields() {
        let svc = service();
        let batch = svc.create(request(5, "dynamic")).await.unwrap();

        let updated = svc
            .update(
                &batch.id,
                UpdateBatchQrCodeRequest {
                    name: Some("Concert".to_string()),
                    prefix: Some(String::new()),
                    url_template: Some("https://x.test/{index}".to_string()),
                    config: Some(HashMap::from([("fg".to_string(), "#000".to_string())])),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Concert");
        assert_eq!(updated.prefix, "ticket", "empty prefix leaves value unchanged");
        assert_eq!(updated.url_template, "https://x.test/{index}");
        assert_eq!(updated.config["fg"], "#000");
        assert_eq!(updated.count, 5);
        assert_eq!(updated.kind, "dynamic");
        assert_eq!(updated.status, "pending");
    }

    #[tokio::test]
    async fn missing_batch_is_not_found() {
        let svc = service();
        assert_matches!(svc.get("batch_nope").await, Err(CoreError::NotFound { .. }));
        assert_matches!(svc.delete("batch_nope").await, Err(CoreError::NotFound { .. }));
        assert_matches!(
            svc.update("batch_nope", UpdateBatchQrCodeRequest::default()).await,
            Err(CoreError::NotFound { .. })
        );
        assert_matches!(svc.items("batch_nope").await, Err(CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_removes_batch() {
        let svc = service();
        let batch = svc.create(request(1, "static")).await.unwrap();
        svc.delete(&batch.id).await.unwrap();
        assert_matches!(svc.get(&batch.id).await, Err(CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn list_normalizes_paging() {
        let svc = service();
        for _ in 0..12 {
            svc.create(request(1, "static")).await.unwrap();
        }

        let page = svc.list("app_1", Some(0), Some(500)).await.unwrap();
        assert_eq!((page.page, page.size), (1, 10));
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total, 12);

        let second = svc.list("app_1", Some(2), None).await.unwrap();
        assert_eq!(second.items.len(), 2);

        let newest = &page.items[0];
        assert!(page.items.iter().all(|b| b.created_at <= newest.created_at));
    }

    #[tokio::test]
    async fn list_requires_app_id() {
        let svc = service();
        assert_matches!(svc.list("", None, None).await, Err(CoreError::Validation(_)));
    }
}
