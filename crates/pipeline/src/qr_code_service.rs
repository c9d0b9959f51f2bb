//! Standalone QR code management.
//!
//! QR codes created here are not tied to a batch. Creating or updating one
//! renders its image best-effort; `generate_image` re-renders on demand and
//! reports failures to the caller, which is how images missing after a batch
//! run are repaired.

use std::sync::Arc;

use office_core::error::CoreError;
use office_core::ids::generate_qr_code_id;
use office_core::pagination::{Page, PageRequest};
use office_core::qr_batch::{self, BatchKind};
use office_db::models::qr_code::{CreateQrCode, QrCode, UpdateQrCode};
use office_db::ItemStore;
use serde::Deserialize;

use crate::renderer::{render_and_record, ImageRenderer, ImageStepError};
use crate::{non_empty, store_failure};

/// Request to create a standalone QR code.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateQrCodeRequest {
    pub app_id: String,
    pub name: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub url: Option<String>,
    pub created_by: String,
}

/// Request to update a QR code. Absent or empty fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateQrCodeRequest {
    pub name: Option<String>,
    pub content: Option<String>,
    pub url: Option<String>,
}

pub struct QrCodeService {
    items: Arc<dyn ItemStore>,
    renderer: Arc<dyn ImageRenderer>,
}

impl QrCodeService {
    pub fn new(items: Arc<dyn ItemStore>, renderer: Arc<dyn ImageRenderer>) -> Self {
        Self { items, renderer }
    }

    /// Persist a QR code, then render its image best-effort.
    pub async fn create(&self, req: CreateQrCodeRequest) -> Result<QrCode, CoreError> {
        let kind = BatchKind::from_str_value(&req.kind)?;
        qr_batch::validate_required("app_id", &req.app_id)?;
        qr_batch::validate_required("name", &req.name)?;
        qr_batch::validate_required("content", &req.content)?;
        qr_batch::validate_required("created_by", &req.created_by)?;

        let input = CreateQrCode {
            id: generate_qr_code_id(),
            app_id: req.app_id,
            name: req.name,
            content: req.content,
            kind: kind.as_str().to_string(),
            url: req.url.unwrap_or_default(),
            batch_id: None,
            batch_index: None,
            created_by: req.created_by,
        };
        let qr_code = self
            .items
            .create_item(&input)
            .await
            .map_err(store_failure("create QR code"))?;

        tracing::info!(qr_code_id = %qr_code.id, app_id = %qr_code.app_id, "QR code created");
        Ok(self.render_best_effort(qr_code).await)
    }

    /// Update name/content/url, then re-render best-effort.
    pub async fn update(&self, id: &str, req: UpdateQrCodeRequest) -> Result<QrCode, CoreError> {
        let input = UpdateQrCode {
            name: non_empty(req.name),
            content: non_empty(req.content),
            url: non_empty(req.url),
        };
        let qr_code = self
            .items
            .update_item(id, &input)
            .await
            .map_err(store_failure("update QR code"))?
            .ok_or_else(|| not_found(id))?;

        Ok(self.render_best_effort(qr_code).await)
    }

    pub async fn delete(&self, id: &str) -> Result<(), CoreError> {
        let deleted = self
            .items
            .delete_item(id)
            .await
            .map_err(store_failure("delete QR code"))?;
        if !deleted {
            return Err(not_found(id));
        }
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<QrCode, CoreError> {
        self.items
            .find_item(id)
            .await
            .map_err(store_failure("get QR code"))?
            .ok_or_else(|| not_found(id))
    }

    /// One page of an application's QR codes, newest first.
    pub async fn list(
        &self,
        app_id: &str,
        page: Option<i64>,
        size: Option<i64>,
    ) -> Result<Page<QrCode>, CoreError> {
        qr_batch::validate_required("app_id", app_id)?;
        let request = PageRequest::normalize(page, size);
        let (rows, total) = self
            .items
            .list_items(app_id, request.limit(), request.offset())
            .await
            .map_err(store_failure("list QR codes"))?;
        Ok(Page::new(rows, total, request))
    }

    /// Render the image for an existing QR code and return its path.
    pub async fn generate_image(&self, id: &str) -> Result<String, CoreError> {
        let qr_code = self.get(id).await?;
        match render_and_record(self.renderer.as_ref(), self.items.as_ref(), &qr_code).await {
            Ok(updated) => Ok(updated.image_path),
            Err(ImageStepError::Missing) => Err(not_found(id)),
            Err(err) => {
                tracing::error!(qr_code_id = id, error = %err, "Failed to generate QR code image");
                Err(CoreError::Internal(
                    "failed to generate QR code image".to_string(),
                ))
            }
        }
    }

    async fn render_best_effort(&self, qr_code: QrCode) -> QrCode {
        match render_and_record(self.renderer.as_ref(), self.items.as_ref(), &qr_code).await {
            Ok(updated) => updated,
            Err(err) => {
                tracing::warn!(qr_code_id = %qr_code.id, error = %err, "Failed to render QR code image");
                qr_code
            }
        }
    }
}

fn not_found(id: &str) -> CoreError {
    CoreError::NotFound {
        entity: "QrCode",
        id: id.to_string(),
    }
}
